//! Application setup: state, routes, and server startup.

pub mod routes;
pub mod server;

use crate::state::AppState;
use axum::Router;
use stagepost_core::AppConfig;
use std::sync::Arc;

/// Build the shared state and the router for `config`.
pub fn initialize_app(config: AppConfig) -> Result<(Arc<AppState>, Router), anyhow::Error> {
    tracing::info!(
        platform = %config.platform().base_url,
        api_version = %config.platform().api_version,
        poll_max_attempts = config.platform().poll.max_attempts,
        poll_interval_ms = config.platform().poll.interval.as_millis() as u64,
        "Initializing upload service"
    );

    let state = Arc::new(AppState::new(config)?);
    let router = routes::setup_routes(state.clone())?;
    Ok((state, router))
}
