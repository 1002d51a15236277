//! Wire events exchanged over the party `WebSocket`.
//!
//! Every frame is a JSON object with an `event` name and, for events that
//! carry a payload, a `data` object:
//!
//! ```json
//! {"event": "join_party", "data": {"code": "K7QZ", "name": "Ada"}}
//! ```
//!
//! [`ClientEvent`] covers everything a browser may send. [`ServerEvent`]
//! covers everything the server pushes back, either to one connection or
//! to every connection in a party's room.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::PartyCode;
use crate::structs::Restaurant;

/// Message carried by `host_left` when the host disconnects.
pub const HOST_LEFT_MESSAGE: &str = "Host has left. Lobby disbanded.";

/// An event sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ClientEvent {
    /// Start a new party hosted by `name`.
    CreateParty {
        /// Host display name.
        name: String,
    },
    /// Join (or rejoin) an existing party.
    JoinParty {
        /// Code of the party to join.
        code: PartyCode,
        /// Display name to join under.
        name: String,
    },
    /// Move the party into the adding phase.
    StartAdding {
        /// Target party.
        code: PartyCode,
    },
    /// Propose a restaurant.
    AddRestaurant {
        /// Target party.
        code: PartyCode,
        /// Restaurant name.
        restaurant: String,
    },
    /// Withdraw a restaurant the sender proposed.
    RemoveRestaurant {
        /// Target party.
        code: PartyCode,
        /// Restaurant name.
        restaurant: String,
    },
    /// Move the party into the voting phase.
    BeginSelection {
        /// Target party.
        code: PartyCode,
    },
    /// Cast (or replace) the sender's ballot.
    SubmitVote {
        /// Target party.
        code: PartyCode,
        /// Names of every restaurant the sender likes.
        liked: Vec<String>,
    },
}

impl ClientEvent {
    /// Wire name of the event, used in log fields.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateParty { .. } => "create_party",
            Self::JoinParty { .. } => "join_party",
            Self::StartAdding { .. } => "start_adding",
            Self::AddRestaurant { .. } => "add_restaurant",
            Self::RemoveRestaurant { .. } => "remove_restaurant",
            Self::BeginSelection { .. } => "begin_selection",
            Self::SubmitVote { .. } => "submit_vote",
        }
    }

    /// Party the event targets, if it names one.
    pub fn code(&self) -> Option<&PartyCode> {
        match self {
            Self::CreateParty { .. } => None,
            Self::JoinParty { code, .. }
            | Self::StartAdding { code }
            | Self::AddRestaurant { code, .. }
            | Self::RemoveRestaurant { code, .. }
            | Self::BeginSelection { code }
            | Self::SubmitVote { code, .. } => Some(code),
        }
    }
}

/// An event pushed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ServerEvent {
    /// A party was created; sent to the host only.
    PartyCreated {
        /// The freshly minted code.
        code: PartyCode,
        /// Host display name.
        host: String,
        /// Member names in display order.
        members: Vec<String>,
    },
    /// The sender's event was rejected.
    Error {
        /// Human-readable reason.
        message: String,
    },
    /// Membership changed.
    PartyUpdated {
        /// Host display name.
        host: String,
        /// Member names in display order.
        members: Vec<String>,
    },
    /// The party entered the adding phase.
    AddingPhase {},
    /// The restaurant list changed.
    RestaurantList {
        /// Every proposed restaurant in insertion order.
        restaurants: Vec<Restaurant>,
    },
    /// The party entered the voting phase.
    VotingPhase {
        /// Names of the proposed restaurants in insertion order.
        restaurants: Vec<String>,
    },
    /// The sender's ballot was stored; other members have yet to vote.
    WaitingForOthers {},
    /// Voting finished.
    Winner {
        /// Winning restaurant, or `None` when nobody liked anything.
        restaurant: Option<String>,
        /// Number of members who liked the winner.
        votes: u32,
    },
    /// The host disconnected and the party was destroyed.
    HostLeft {
        /// Human-readable notice.
        message: String,
    },
}

impl ServerEvent {
    /// Build an `error` event.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Wire name of the event, used in log fields.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PartyCreated { .. } => "party_created",
            Self::Error { .. } => "error",
            Self::PartyUpdated { .. } => "party_updated",
            Self::AddingPhase {} => "adding_phase",
            Self::RestaurantList { .. } => "restaurant_list",
            Self::VotingPhase { .. } => "voting_phase",
            Self::WaitingForOthers {} => "waiting_for_others",
            Self::Winner { .. } => "winner",
            Self::HostLeft { .. } => "host_left",
        }
    }
}
