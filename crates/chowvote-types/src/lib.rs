//! Shared type definitions for Chowvote.
//!
//! This crate is the single source of truth for every type that crosses
//! the `WebSocket`. Types flow downstream to `TypeScript` via `ts-rs` for
//! the browser client.
//!
//! # Modules
//!
//! - [`ids`] -- Connection identities and party codes
//! - [`enums`] -- The party [`Phase`]
//! - [`structs`] -- Entity structs ([`Restaurant`])
//! - [`events`] -- Inbound [`ClientEvent`] and outbound [`ServerEvent`] frames

pub mod enums;
pub mod events;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::Phase;
pub use events::{ClientEvent, HOST_LEFT_MESSAGE, ServerEvent};
pub use ids::{CODE_ALPHABET, CODE_LENGTH, ConnectionId, PartyCode};
pub use structs::Restaurant;
