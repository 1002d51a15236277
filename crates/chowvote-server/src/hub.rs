//! Connection hub: per-connection outboxes and party rooms.
//!
//! Every open `WebSocket` registers an unbounded [`mpsc`] outbox with the
//! [`Hub`]. Rooms are plain sets of connection IDs keyed by party code.
//! A room broadcast resolves the set at delivery time, so connections that
//! left before the broadcast never see it.

use std::collections::{BTreeSet, HashMap};

use chowvote_core::{Dispatch, Recipient};
use chowvote_types::{ConnectionId, PartyCode, ServerEvent};
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Sending half of a connection's outbox.
pub type Outbox = mpsc::UnboundedSender<ServerEvent>;

/// Registered connections and the rooms they belong to.
#[derive(Debug, Default)]
pub struct Hub {
    connections: HashMap<ConnectionId, Outbox>,
    rooms: HashMap<PartyCode, BTreeSet<ConnectionId>>,
}

impl Hub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection and return the receiving half of its
    /// outbox.
    pub fn register(&mut self, conn: ConnectionId) -> mpsc::UnboundedReceiver<ServerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections.insert(conn, tx);
        rx
    }

    /// Drop a connection's outbox and remove it from every room.
    pub fn unregister(&mut self, conn: ConnectionId) {
        self.connections.remove(&conn);
        self.rooms.retain(|_, members| {
            members.remove(&conn);
            !members.is_empty()
        });
    }

    /// Add a connection to a room.
    pub fn join(&mut self, conn: ConnectionId, code: PartyCode) {
        self.rooms.entry(code).or_default().insert(conn);
    }

    /// Disband a room.
    pub fn close_room(&mut self, code: &PartyCode) {
        self.rooms.remove(code);
    }

    /// Connections currently in a room.
    pub fn room_members(&self, code: &PartyCode) -> Vec<ConnectionId> {
        self.rooms
            .get(code)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of registered connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of open rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Apply registry dispatches in order. Returns the number of events
    /// delivered.
    pub fn apply(&mut self, dispatches: Vec<Dispatch>) -> usize {
        let mut delivered: usize = 0;
        for dispatch in dispatches {
            match dispatch {
                Dispatch::JoinRoom { conn, code } => self.join(conn, code),
                Dispatch::CloseRoom { code } => self.close_room(&code),
                Dispatch::Send {
                    recipient: Recipient::Connection(conn),
                    event,
                } => {
                    if self.deliver(conn, event) {
                        delivered = delivered.saturating_add(1);
                    }
                }
                Dispatch::Send {
                    recipient: Recipient::Room(code),
                    event,
                } => {
                    let members = self.room_members(&code);
                    trace!(%code, event = event.name(), recipients = members.len(), "room broadcast");
                    for conn in members {
                        if self.deliver(conn, event.clone()) {
                            delivered = delivered.saturating_add(1);
                        }
                    }
                }
            }
        }
        delivered
    }

    /// Push an event into one connection's outbox.
    pub fn deliver(&self, conn: ConnectionId, event: ServerEvent) -> bool {
        let Some(outbox) = self.connections.get(&conn) else {
            return false;
        };
        let name = event.name();
        // send fails only when the socket task has already dropped its
        // receiver; the disconnect path cleans up after it.
        if outbox.send(event).is_err() {
            debug!(%conn, event = name, "outbox closed, event dropped");
            return false;
        }
        true
    }
}
