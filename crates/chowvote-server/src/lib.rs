//! Party server for Chowvote.
//!
//! This crate puts the [`chowvote_core`] registry on the network:
//!
//! - **`WebSocket` endpoint** (`/ws`) carrying JSON `{"event", "data"}`
//!   frames in both directions
//! - **Entry page** (`GET /`) with a small browser client
//! - **Idle sweeper** that evicts parties nobody has touched in a while
//!
//! # Architecture
//!
//! Each socket task owns one [`ConnectionId`](chowvote_types::ConnectionId)
//! and an unbounded outbox registered with the [`Hub`](hub::Hub). Inbound
//! frames go through [`AppState`], which applies them to the registry and
//! hands the resulting dispatches to the hub for delivery.

pub mod error;
pub mod handlers;
pub mod hub;
pub mod page;
pub mod router;
pub mod server;
pub mod state;
pub mod sweeper;
pub mod ws;

// Re-export primary types for convenience.
pub use error::WebError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, serve, start_server};
pub use state::AppState;
pub use sweeper::spawn_sweeper;
