//! Axum router construction for the party server.
//!
//! Assembles the entry page and the `WebSocket` endpoint into a single
//! [`Router`] with CORS enabled for any origin.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::page::WS_PATH;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router.
///
/// - `GET /` -- the single-page client
/// - `GET /ws` -- party `WebSocket`
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route(WS_PATH, get(ws::ws_party))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
