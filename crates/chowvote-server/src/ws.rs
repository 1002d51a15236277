//! `WebSocket` handler for party clients.
//!
//! Clients connect to `GET /ws`. Each text frame is one JSON-encoded
//! [`ClientEvent`](chowvote_types::ClientEvent); every event addressed to
//! the connection is written back as one text frame.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tracing::{debug, warn};

use crate::state::AppState;

/// Upgrade an HTTP request to a party `WebSocket` connection.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_party(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Drive one connection until either side goes away, then run the
/// disconnect path exactly once.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let (conn, mut rx) = state.connect().await;
    debug!(%conn, "WebSocket client connected");

    loop {
        tokio::select! {
            outgoing = rx.recv() => {
                let Some(event) = outgoing else {
                    break;
                };
                let json = match serde_json::to_string(&event) {
                    Ok(j) => j,
                    Err(e) => {
                        warn!(%conn, "Failed to serialize server event: {e}");
                        continue;
                    }
                };
                if socket.send(Message::Text(json.into())).await.is_err() {
                    debug!(%conn, "WebSocket client disconnected (send failed)");
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        state.handle_frame(conn, text.as_str()).await;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!(%conn, "WebSocket client disconnected (pong failed)");
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(%conn, "WebSocket client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        debug!(%conn, "WebSocket error: {e}");
                        break;
                    }
                    Some(Ok(_)) => {
                        // Binary and pong frames carry no events.
                    }
                }
            }
        }
    }

    state.disconnect(conn).await;
}
