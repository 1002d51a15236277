//! The [`Party`] entity: one game session.
//!
//! A party tracks two keyspaces. Members are keyed by [`ConnectionId`] and
//! carry a display name; ballots are keyed by display name. A name maps to
//! at most one live connection: a connection joining under a name that is
//! already taken evicts the previous holder, which is how a member who lost
//! their socket reclaims their seat (and their ballot) by rejoining.

use chowvote_types::{ConnectionId, PartyCode, Phase, Restaurant};
use chrono::{DateTime, Utc};

use crate::tally::Tally;

/// A member seat: the connection currently holding a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Connection holding the seat.
    pub conn: ConnectionId,
    /// Display name.
    pub name: String,
}

/// One member's liked set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ballot {
    /// Display name of the voter.
    pub voter: String,
    /// Restaurant names the voter likes.
    pub liked: Vec<String>,
}

/// One game session.
#[derive(Debug, Clone)]
pub struct Party {
    code: PartyCode,
    host: String,
    members: Vec<Member>,
    restaurants: Vec<Restaurant>,
    phase: Phase,
    ballots: Vec<Ballot>,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
}

impl Party {
    /// Create a party in the lobby with the host as its only member.
    pub fn new(code: PartyCode, host_conn: ConnectionId, host: String, now: DateTime<Utc>) -> Self {
        Self {
            code,
            members: vec![Member {
                conn: host_conn,
                name: host.clone(),
            }],
            host,
            restaurants: Vec::new(),
            phase: Phase::Lobby,
            ballots: Vec::new(),
            created_at: now,
            last_activity: now,
        }
    }

    /// The party code.
    pub const fn code(&self) -> &PartyCode {
        &self.code
    }

    /// Host display name.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Current phase.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Move to `phase`.
    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Member seats in display order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Member names in display order.
    pub fn member_names(&self) -> Vec<String> {
        self.members.iter().map(|m| m.name.clone()).collect()
    }

    /// Display name held by `conn`, if it is a member.
    pub fn name_of(&self, conn: ConnectionId) -> Option<&str> {
        self.members
            .iter()
            .find(|m| m.conn == conn)
            .map(|m| m.name.as_str())
    }

    /// Whether `conn` holds a seat.
    pub fn has_member(&self, conn: ConnectionId) -> bool {
        self.members.iter().any(|m| m.conn == conn)
    }

    /// Seat `conn` under `name`.
    ///
    /// Any seat already holding `name` is vacated first and its connection
    /// returned. A connection that already holds a seat, under this name or
    /// another, keeps its position in the member list and takes the new
    /// name; only a new connection is appended at the end.
    pub fn seat(&mut self, conn: ConnectionId, name: &str) -> Option<ConnectionId> {
        let evicted = self
            .members
            .iter()
            .position(|m| m.name == name && m.conn != conn)
            .map(|idx| self.members.remove(idx).conn);

        if let Some(existing) = self.members.iter_mut().find(|m| m.conn == conn) {
            name.clone_into(&mut existing.name);
        } else {
            self.members.push(Member {
                conn,
                name: name.to_owned(),
            });
        }
        evicted
    }

    /// Remove the seat held by `conn`, returning its display name.
    pub fn unseat(&mut self, conn: ConnectionId) -> Option<String> {
        let idx = self.members.iter().position(|m| m.conn == conn)?;
        Some(self.members.remove(idx).name)
    }

    /// Proposed restaurants in insertion order.
    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    /// Proposed restaurant names in insertion order.
    pub fn restaurant_names(&self) -> Vec<String> {
        self.restaurants.iter().map(|r| r.name.clone()).collect()
    }

    /// Append a proposal.
    pub fn add_restaurant(&mut self, name: &str, added_by: &str) {
        self.restaurants.push(Restaurant::new(name, added_by));
    }

    /// Remove every entry exactly matching `(name, added_by)`.
    ///
    /// Returns how many entries were removed.
    pub fn remove_restaurant(&mut self, name: &str, added_by: &str) -> usize {
        let before = self.restaurants.len();
        self.restaurants.retain(|r| !r.matches(name, added_by));
        before.saturating_sub(self.restaurants.len())
    }

    /// Store `voter`'s ballot, replacing an earlier one in place.
    pub fn record_vote(&mut self, voter: &str, liked: Vec<String>) {
        if let Some(existing) = self.ballots.iter_mut().find(|b| b.voter == voter) {
            existing.liked = liked;
        } else {
            self.ballots.push(Ballot {
                voter: voter.to_owned(),
                liked,
            });
        }
    }

    /// Ballots in first-submission order.
    pub fn ballots(&self) -> &[Ballot] {
        &self.ballots
    }

    /// Whether the ballot count has reached the member count.
    ///
    /// Ballots are keyed by name and outlive their voter's seat, so a ballot
    /// from a member who has since left still counts toward the total.
    pub fn all_members_voted(&self) -> bool {
        self.ballots.len() == self.members.len()
    }

    /// Tally every ballot on file.
    pub fn tally(&self) -> Tally {
        Tally::from_ballots(self.ballots.iter().map(|b| b.liked.as_slice()))
    }

    /// When the party was created.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the party last handled an event.
    pub const fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// Record activity at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.last_activity {
            self.last_activity = now;
        }
    }
}
