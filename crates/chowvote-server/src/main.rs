//! Chowvote server entry point.
//!
//! Loads `chowvote-config.yaml` from the working directory when present,
//! initializes logging, then serves the entry page and the party
//! `WebSocket` until `Ctrl-C`.

use std::path::Path;
use std::sync::Arc;

use chowvote_core::ChowvoteConfig;
use chowvote_server::{AppState, ServerConfig, spawn_sweeper, start_server};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Default configuration file name.
const CONFIG_FILE: &str = "chowvote-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the server cannot
/// bind its address.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(CONFIG_FILE);
    let config = if path.exists() {
        ChowvoteConfig::from_file(path)?
    } else {
        ChowvoteConfig::parse("{}")?
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        host = config.server.host,
        port = config.server.port,
        enforce_phase_order = config.party.enforce_phase_order,
        host_only_transitions = config.party.host_only_transitions,
        idle_timeout_secs = config.party.idle_timeout_secs,
        config_file = path.exists(),
        "chowvote starting"
    );

    let state = Arc::new(AppState::new(&config.party)?);
    let sweeper = spawn_sweeper(Arc::clone(&state), &config.party);

    let result = start_server(&ServerConfig::from(&config.server), state).await;

    if let Some(handle) = sweeper {
        handle.abort();
    }
    result?;

    info!("chowvote shutdown complete");
    Ok(())
}
