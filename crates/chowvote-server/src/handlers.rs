//! HTTP endpoint handlers for the party server.
//!
//! The only HTTP surface besides the `WebSocket` upgrade is the entry page.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;

use crate::error::WebError;
use crate::state::AppState;

/// Serve the single-page client.
///
/// # Route
///
/// `GET /`
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, WebError> {
    state.pages().index().map(Html)
}
