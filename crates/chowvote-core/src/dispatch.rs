//! Instructions the registry hands to the transport.
//!
//! Registry operations never touch sockets. Each returns an ordered list of
//! [`Dispatch`] values which the transport applies in sequence, so that a
//! connection joining a room receives the broadcast that follows it.

use chowvote_types::{ConnectionId, PartyCode, ServerEvent};

/// Who an outbound event is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// A single connection.
    Connection(ConnectionId),
    /// Every connection currently registered in the party's room.
    Room(PartyCode),
}

/// One step for the transport to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Register a connection in a party's room.
    JoinRoom {
        /// Connection to register.
        conn: ConnectionId,
        /// Room to join.
        code: PartyCode,
    },
    /// Deliver an event.
    Send {
        /// Addressee.
        recipient: Recipient,
        /// The event.
        event: ServerEvent,
    },
    /// Disband a room whose party no longer exists.
    CloseRoom {
        /// Room to disband.
        code: PartyCode,
    },
}

impl Dispatch {
    /// Address `event` to a single connection.
    pub const fn to_conn(conn: ConnectionId, event: ServerEvent) -> Self {
        Self::Send {
            recipient: Recipient::Connection(conn),
            event,
        }
    }

    /// Address `event` to a party's room.
    pub const fn to_room(code: PartyCode, event: ServerEvent) -> Self {
        Self::Send {
            recipient: Recipient::Room(code),
            event,
        }
    }

    /// The event carried by a [`Dispatch::Send`].
    pub const fn event(&self) -> Option<&ServerEvent> {
        match self {
            Self::Send { event, .. } => Some(event),
            Self::JoinRoom { .. } | Self::CloseRoom { .. } => None,
        }
    }
}
