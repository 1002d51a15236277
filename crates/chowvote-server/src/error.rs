//! Error types for the party server's HTTP surface.
//!
//! [`WebError`] converts into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur while serving HTTP requests.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// The entry page template failed to load or render.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Template(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("page error: {e}")),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
