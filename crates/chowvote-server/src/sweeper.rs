//! Background idle-party sweeper.

use std::sync::Arc;

use chowvote_core::PartyConfig;
use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::info;

use crate::state::AppState;

/// Spawn the sweeper task, or return `None` when idle eviction is off.
pub fn spawn_sweeper(state: Arc<AppState>, config: &PartyConfig) -> Option<JoinHandle<()>> {
    let timeout = config.idle_timeout()?;
    let period = config.sweep_interval();
    info!(
        idle_timeout_secs = timeout.as_secs(),
        sweep_interval_secs = period.as_secs(),
        "idle sweeper started"
    );

    Some(tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            state.sweep_idle(Utc::now(), timeout).await;
        }
    }))
}
