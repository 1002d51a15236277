//! Party session core for Chowvote.
//!
//! A host creates a party, members join with its four-character code, the
//! group proposes restaurants, votes on liked sets and gets a plurality
//! winner. This crate holds that state machine and nothing else: it never
//! touches a socket.
//!
//! # Architecture
//!
//! [`PartyRegistry`] owns every [`Party`]. The transport feeds it one
//! [`ClientEvent`](chowvote_types::ClientEvent) at a time together with
//! the sender's [`ConnectionId`](chowvote_types::ConnectionId) and gets
//! back an ordered list of [`Dispatch`] steps: join a room, send to one
//! connection, broadcast to a room, close a room.
//!
//! # Modules
//!
//! - [`registry`] -- The registry and its optional phase/host guards
//! - [`party`] -- Party state: seats, proposals, ballots
//! - [`tally`] -- Plurality tally with a pinned tie-break order
//! - [`code`] -- Party code generation
//! - [`dispatch`] -- Transport instructions
//! - [`config`] -- YAML configuration
//! - [`error`] -- Operation errors

pub mod code;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod party;
pub mod registry;
pub mod tally;

pub use code::{CodeSource, RandomCodes, SequenceCodes};
pub use config::{ChowvoteConfig, ConfigError, ListenConfig, LoggingConfig, PartyConfig};
pub use dispatch::{Dispatch, Recipient};
pub use error::PartyError;
pub use party::{Ballot, Member, Party};
pub use registry::{PARTY_EXPIRED_MESSAGE, PartyRegistry, PartyRules};
pub use tally::Tally;
