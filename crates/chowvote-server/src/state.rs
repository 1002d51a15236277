//! Shared application state for the party server.
//!
//! [`AppState`] owns the [`PartyRegistry`] and the connection [`Hub`]. Both
//! sit behind their own async mutex and are always locked in the same
//! order, registry first, so every event is applied and its fan-out
//! delivered before the next event is looked at. Delivery only pushes into
//! unbounded outboxes, so holding the locks across it never waits on a
//! slow socket.

use std::time::Duration;

use chowvote_core::{Dispatch, PartyConfig, PartyRegistry, PartyRules};
use chowvote_types::{ClientEvent, ConnectionId, ServerEvent};
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info};

use crate::error::WebError;
use crate::hub::Hub;
use crate::page::PageRenderer;

/// Shared state for all request handlers and socket tasks.
#[derive(Debug)]
pub struct AppState {
    registry: Mutex<PartyRegistry>,
    hub: Mutex<Hub>,
    pages: PageRenderer,
}

impl AppState {
    /// Create state with an empty registry governed by `config`.
    pub fn new(config: &PartyConfig) -> Result<Self, WebError> {
        Self::with_registry(PartyRegistry::with_rules(PartyRules::from(config)))
    }

    /// Create state around an existing registry.
    pub fn with_registry(registry: PartyRegistry) -> Result<Self, WebError> {
        Ok(Self {
            registry: Mutex::new(registry),
            hub: Mutex::new(Hub::new()),
            pages: PageRenderer::new()?,
        })
    }

    /// The page renderer.
    pub const fn pages(&self) -> &PageRenderer {
        &self.pages
    }

    /// Register a new connection. The receiver yields every event addressed
    /// to it.
    pub async fn connect(&self) -> (ConnectionId, mpsc::UnboundedReceiver<ServerEvent>) {
        let conn = ConnectionId::new();
        let rx = self.hub.lock().await.register(conn);
        debug!(%conn, "connection registered");
        (conn, rx)
    }

    /// Apply one client event and deliver its fan-out.
    pub async fn handle_event(&self, conn: ConnectionId, event: ClientEvent) {
        let mut registry = self.registry.lock().await;
        let dispatches = registry.handle(conn, event);
        self.hub.lock().await.apply(dispatches);
    }

    /// Decode one text frame and apply it.
    ///
    /// A frame that does not decode is answered with an `error` event to
    /// the sender only.
    pub async fn handle_frame(&self, conn: ConnectionId, frame: &str) {
        match serde_json::from_str::<ClientEvent>(frame) {
            Ok(event) => self.handle_event(conn, event).await,
            Err(e) => {
                debug!(%conn, error = %e, "malformed frame");
                let reply = ServerEvent::error(format!("Malformed event: {e}"));
                self.hub.lock().await.deliver(conn, reply);
            }
        }
    }

    /// Tear down a connection: leave its party, then drop its outbox.
    pub async fn disconnect(&self, conn: ConnectionId) {
        let mut registry = self.registry.lock().await;
        let dispatches = registry.disconnect(conn);
        let mut hub = self.hub.lock().await;
        hub.apply(dispatches);
        hub.unregister(conn);
        debug!(%conn, "connection unregistered");
    }

    /// Evict parties idle for longer than `timeout`. Returns how many were
    /// evicted.
    pub async fn sweep_idle(&self, now: DateTime<Utc>, timeout: Duration) -> usize {
        let mut registry = self.registry.lock().await;
        let dispatches = registry.evict_idle(now, timeout);
        let evicted = dispatches
            .iter()
            .filter(|d| matches!(d, Dispatch::CloseRoom { .. }))
            .count();
        if evicted > 0 {
            info!(evicted, remaining = registry.len(), "idle sweep");
        }
        self.hub.lock().await.apply(dispatches);
        evicted
    }

    /// Number of live parties.
    pub async fn party_count(&self) -> usize {
        self.registry.lock().await.len()
    }

    /// Number of open connections.
    pub async fn connection_count(&self) -> usize {
        self.hub.lock().await.connection_count()
    }
}
