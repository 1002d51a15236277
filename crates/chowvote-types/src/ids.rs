//! Identifier types for connections and parties.
//!
//! Connections and parties live in separate keyspaces: a [`ConnectionId`]
//! names one live `WebSocket` for as long as it stays open, while a
//! [`PartyCode`] is the short human-typed key that members share to join
//! the same party.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Number of characters in a party code.
pub const CODE_LENGTH: usize = 4;

/// Characters a party code is drawn from (uppercase letters and digits).
pub const CODE_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Opaque identity of one transport connection.
///
/// Stable for the lifetime of the connection and never reused. The core
/// only stores it as a key; it is never sent over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ConnectionId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Short code identifying a party, e.g. `"K7QZ"`.
///
/// Codes minted by the server are always [`CODE_LENGTH`] characters from
/// [`CODE_ALPHABET`]. Codes arriving from clients are accepted verbatim and
/// simply fail to match any party when malformed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PartyCode(String);

impl PartyCode {
    /// Wrap a raw code string.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Borrow the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the code has the shape of a server-minted code.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == CODE_LENGTH && self.0.bytes().all(|b| CODE_ALPHABET.contains(&b))
    }
}

impl core::fmt::Display for PartyCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PartyCode {
    fn from(code: &str) -> Self {
        Self(code.to_owned())
    }
}
