//! The party registry: every live party, keyed by code.
//!
//! [`PartyRegistry`] is the only owner of [`Party`] state. Each operation
//! runs to completion against `&mut self` and returns the ordered
//! [`Dispatch`] list the transport must apply. Callers that share the
//! registry between tasks wrap it in a single mutex so events stay atomic.
//!
//! # Phase guards
//!
//! By default any connection may advance any party at any time, and
//! out-of-order events are applied as-is. [`PartyRules`] can turn on
//! phase-order enforcement and host-only transitions.

use std::collections::BTreeMap;
use std::time::Duration;

use chowvote_types::{ClientEvent, ConnectionId, HOST_LEFT_MESSAGE, PartyCode, Phase, ServerEvent};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::code::{CodeSource, RandomCodes};
use crate::config::PartyConfig;
use crate::dispatch::Dispatch;
use crate::error::PartyError;
use crate::party::Party;

/// Maximum number of candidate codes drawn before `create_party` gives up.
pub const MAX_CODE_ATTEMPTS: u32 = 1000;

/// Message sent to members of a party removed by the idle sweeper.
pub const PARTY_EXPIRED_MESSAGE: &str = "Party expired";

/// Optional server-side guards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartyRules {
    /// Reject events that do not fit the party's current phase.
    pub enforce_phase_order: bool,
    /// Only the host may start the adding and voting phases.
    pub host_only_transitions: bool,
}

impl From<&PartyConfig> for PartyRules {
    fn from(config: &PartyConfig) -> Self {
        Self {
            enforce_phase_order: config.enforce_phase_order,
            host_only_transitions: config.host_only_transitions,
        }
    }
}

impl PartyRules {
    fn require_phase(self, party: &Party, expected: Phase) -> Result<(), PartyError> {
        if self.enforce_phase_order && party.phase() != expected {
            return Err(PartyError::WrongPhase {
                phase: party.phase(),
            });
        }
        Ok(())
    }

    fn require_host(self, party: &Party, conn: ConnectionId) -> Result<(), PartyError> {
        if !self.host_only_transitions {
            return Ok(());
        }
        let name = sender_name(party, conn)?;
        if name == party.host() {
            Ok(())
        } else {
            Err(PartyError::NotHost(party.code().clone()))
        }
    }
}

/// In-memory mapping from party code to party state.
pub struct PartyRegistry {
    parties: BTreeMap<PartyCode, Party>,
    codes: Box<dyn CodeSource>,
    rules: PartyRules,
}

impl core::fmt::Debug for PartyRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PartyRegistry")
            .field("parties", &self.parties.len())
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl Default for PartyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PartyRegistry {
    /// Create an empty, permissive registry with random codes.
    pub fn new() -> Self {
        Self::with_rules(PartyRules::default())
    }

    /// Create an empty registry with the given guards.
    pub fn with_rules(rules: PartyRules) -> Self {
        Self {
            parties: BTreeMap::new(),
            codes: Box::new(RandomCodes),
            rules,
        }
    }

    /// Replace the code source.
    #[must_use]
    pub fn with_code_source(mut self, codes: impl CodeSource + 'static) -> Self {
        self.codes = Box::new(codes);
        self
    }

    /// Active guards.
    pub const fn rules(&self) -> PartyRules {
        self.rules
    }

    /// Number of live parties.
    pub fn len(&self) -> usize {
        self.parties.len()
    }

    /// Whether no party is live.
    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }

    /// Look up a live party.
    pub fn party(&self, code: &PartyCode) -> Option<&Party> {
        self.parties.get(code)
    }

    /// Whether `code` names a live party.
    pub fn contains(&self, code: &PartyCode) -> bool {
        self.parties.contains_key(code)
    }

    /// Apply a client event at the current time.
    pub fn handle(&mut self, conn: ConnectionId, event: ClientEvent) -> Vec<Dispatch> {
        self.handle_at(conn, event, Utc::now())
    }

    /// Apply a client event at `now`.
    ///
    /// Failures never propagate: they become a single `error` event for the
    /// sender and leave the registry unchanged.
    pub fn handle_at(
        &mut self,
        conn: ConnectionId,
        event: ClientEvent,
        now: DateTime<Utc>,
    ) -> Vec<Dispatch> {
        let event_name = event.name();
        let result = match event {
            ClientEvent::CreateParty { name } => self.create_party(conn, &name, now),
            ClientEvent::JoinParty { code, name } => self.join_party(conn, &code, &name, now),
            ClientEvent::StartAdding { code } => self.start_adding(conn, &code, now),
            ClientEvent::AddRestaurant { code, restaurant } => {
                self.add_restaurant(conn, &code, &restaurant, now)
            }
            ClientEvent::RemoveRestaurant { code, restaurant } => {
                self.remove_restaurant(conn, &code, &restaurant, now)
            }
            ClientEvent::BeginSelection { code } => self.begin_selection(conn, &code, now),
            ClientEvent::SubmitVote { code, liked } => self.submit_vote(conn, &code, liked, now),
        };

        result.unwrap_or_else(|e| {
            debug!(%conn, event = event_name, error = %e, "event rejected");
            vec![Dispatch::to_conn(conn, ServerEvent::error(e.client_message()))]
        })
    }

    /// Create a party hosted by `name` under a fresh code.
    pub fn create_party(
        &mut self,
        conn: ConnectionId,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Dispatch>, PartyError> {
        let code = self.unused_code()?;
        let party = Party::new(code.clone(), conn, name.to_owned(), now);
        let event = ServerEvent::PartyCreated {
            code: code.clone(),
            host: party.host().to_owned(),
            members: party.member_names(),
        };
        self.parties.insert(code.clone(), party);
        info!(%code, host = name, live = self.parties.len(), "party created");

        Ok(vec![
            Dispatch::JoinRoom {
                conn,
                code,
            },
            Dispatch::to_conn(conn, event),
        ])
    }

    /// Join `code` as `name`, taking over any seat already holding `name`.
    pub fn join_party(
        &mut self,
        conn: ConnectionId,
        code: &PartyCode,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Dispatch>, PartyError> {
        let party = self.party_mut(code)?;
        if let Some(evicted) = party.seat(conn, name) {
            debug!(%code, %evicted, %conn, name, "seat taken over by rejoin");
        }
        party.touch(now);

        let mut dispatches = vec![
            Dispatch::JoinRoom {
                conn,
                code: code.clone(),
            },
            Dispatch::to_room(
                code.clone(),
                ServerEvent::PartyUpdated {
                    host: party.host().to_owned(),
                    members: party.member_names(),
                },
            ),
        ];

        let catch_up = match party.phase() {
            Phase::Lobby => None,
            Phase::Adding => Some(ServerEvent::AddingPhase {}),
            Phase::Voting => Some(ServerEvent::VotingPhase {
                restaurants: party.restaurant_names(),
            }),
            Phase::Results => {
                let (restaurant, votes) = party.tally().outcome();
                Some(ServerEvent::Winner { restaurant, votes })
            }
        };
        if let Some(event) = catch_up {
            dispatches.push(Dispatch::to_conn(conn, event));
        }

        debug!(%code, %conn, name, phase = %party.phase(), members = party.members().len(), "member joined");
        Ok(dispatches)
    }

    /// Move the party into the adding phase.
    pub fn start_adding(
        &mut self,
        conn: ConnectionId,
        code: &PartyCode,
        now: DateTime<Utc>,
    ) -> Result<Vec<Dispatch>, PartyError> {
        let rules = self.rules;
        let party = self.party_mut(code)?;
        rules.require_host(party, conn)?;
        rules.require_phase(party, Phase::Lobby)?;

        party.set_phase(Phase::Adding);
        party.touch(now);
        debug!(%code, %conn, "adding phase started");

        Ok(vec![Dispatch::to_room(code.clone(), ServerEvent::AddingPhase {})])
    }

    /// Append `restaurant`, credited to the sender.
    pub fn add_restaurant(
        &mut self,
        conn: ConnectionId,
        code: &PartyCode,
        restaurant: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Dispatch>, PartyError> {
        let rules = self.rules;
        let party = self.party_mut(code)?;
        let sender = sender_name(party, conn)?;
        rules.require_phase(party, Phase::Adding)?;

        party.add_restaurant(restaurant, &sender);
        party.touch(now);
        debug!(%code, restaurant, added_by = sender, "restaurant added");

        Ok(vec![restaurant_list(party)])
    }

    /// Remove every entry `(restaurant, sender)`.
    pub fn remove_restaurant(
        &mut self,
        conn: ConnectionId,
        code: &PartyCode,
        restaurant: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Dispatch>, PartyError> {
        let rules = self.rules;
        let party = self.party_mut(code)?;
        let sender = sender_name(party, conn)?;
        rules.require_phase(party, Phase::Adding)?;

        let removed = party.remove_restaurant(restaurant, &sender);
        party.touch(now);
        debug!(%code, restaurant, added_by = sender, removed, "restaurant removed");

        Ok(vec![restaurant_list(party)])
    }

    /// Move the party into the voting phase.
    pub fn begin_selection(
        &mut self,
        conn: ConnectionId,
        code: &PartyCode,
        now: DateTime<Utc>,
    ) -> Result<Vec<Dispatch>, PartyError> {
        let rules = self.rules;
        let party = self.party_mut(code)?;
        rules.require_host(party, conn)?;
        rules.require_phase(party, Phase::Adding)?;

        party.set_phase(Phase::Voting);
        party.touch(now);
        debug!(%code, %conn, restaurants = party.restaurants().len(), "voting phase started");

        Ok(vec![Dispatch::to_room(
            code.clone(),
            ServerEvent::VotingPhase {
                restaurants: party.restaurant_names(),
            },
        )])
    }

    /// Store the sender's ballot; finish the vote once the ballot count
    /// equals the member count.
    pub fn submit_vote(
        &mut self,
        conn: ConnectionId,
        code: &PartyCode,
        liked: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Dispatch>, PartyError> {
        let rules = self.rules;
        let party = self.party_mut(code)?;
        let sender = sender_name(party, conn)?;
        rules.require_phase(party, Phase::Voting)?;

        party.record_vote(&sender, liked);
        party.touch(now);

        if !party.all_members_voted() {
            debug!(%code, voter = sender, ballots = party.ballots().len(), "ballot stored");
            return Ok(vec![Dispatch::to_conn(conn, ServerEvent::WaitingForOthers {})]);
        }

        party.set_phase(Phase::Results);
        let (restaurant, votes) = party.tally().outcome();
        info!(%code, winner = ?restaurant, votes, "voting finished");

        Ok(vec![Dispatch::to_room(
            code.clone(),
            ServerEvent::Winner { restaurant, votes },
        )])
    }

    /// Handle a closed connection.
    ///
    /// Only the first party holding a seat for `conn` is affected, scanning
    /// parties in code order. A connection normally sits in one party, so the
    /// order only matters for a client that joined several. Losing the host
    /// destroys the party.
    pub fn disconnect(&mut self, conn: ConnectionId) -> Vec<Dispatch> {
        let Some(code) = self
            .parties
            .iter()
            .find(|(_, party)| party.has_member(conn))
            .map(|(code, _)| code.clone())
        else {
            return Vec::new();
        };
        let Some(party) = self.parties.get_mut(&code) else {
            return Vec::new();
        };
        let Some(name) = party.unseat(conn) else {
            return Vec::new();
        };

        if name == party.host() {
            self.parties.remove(&code);
            info!(%code, host = name, live = self.parties.len(), "host left, party destroyed");
            return vec![
                Dispatch::to_room(
                    code.clone(),
                    ServerEvent::HostLeft {
                        message: String::from(HOST_LEFT_MESSAGE),
                    },
                ),
                Dispatch::CloseRoom { code },
            ];
        }

        debug!(%code, %conn, name, members = party.members().len(), "member left");
        vec![Dispatch::to_room(
            code,
            ServerEvent::PartyUpdated {
                host: party.host().to_owned(),
                members: party.member_names(),
            },
        )]
    }

    /// Remove every party idle for longer than `timeout` as of `now`.
    ///
    /// Members of an evicted party receive an `error` event and the room is
    /// closed. No `host_left` is sent.
    pub fn evict_idle(&mut self, now: DateTime<Utc>, timeout: Duration) -> Vec<Dispatch> {
        let Ok(timeout) = chrono::Duration::from_std(timeout) else {
            return Vec::new();
        };
        let expired: Vec<PartyCode> = self
            .parties
            .values()
            .filter(|party| now.signed_duration_since(party.last_activity()) > timeout)
            .map(|party| party.code().clone())
            .collect();

        let mut dispatches = Vec::with_capacity(expired.len().saturating_mul(2));
        for code in expired {
            if let Some(party) = self.parties.remove(&code) {
                info!(
                    %code,
                    idle_secs = now.signed_duration_since(party.last_activity()).num_seconds(),
                    "idle party evicted"
                );
            }
            dispatches.push(Dispatch::to_room(
                code.clone(),
                ServerEvent::error(PARTY_EXPIRED_MESSAGE),
            ));
            dispatches.push(Dispatch::CloseRoom { code });
        }
        dispatches
    }

    fn party_mut(&mut self, code: &PartyCode) -> Result<&mut Party, PartyError> {
        self.parties
            .get_mut(code)
            .ok_or_else(|| PartyError::PartyNotFound(code.clone()))
    }

    fn unused_code(&mut self) -> Result<PartyCode, PartyError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let candidate = self.codes.next_code();
            if !self.parties.contains_key(&candidate) {
                return Ok(candidate);
            }
            debug!(code = %candidate, "party code collision, re-rolling");
        }
        Err(PartyError::CodesExhausted {
            attempts: MAX_CODE_ATTEMPTS,
        })
    }
}

fn sender_name(party: &Party, conn: ConnectionId) -> Result<String, PartyError> {
    party
        .name_of(conn)
        .map(str::to_owned)
        .ok_or_else(|| PartyError::UnknownSender(party.code().clone()))
}

fn restaurant_list(party: &Party) -> Dispatch {
    Dispatch::to_room(
        party.code().clone(),
        ServerEvent::RestaurantList {
            restaurants: party.restaurants().to_vec(),
        },
    )
}
