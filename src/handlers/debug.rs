use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use std::time::SystemTime;

use crate::AppState;

#[derive(Serialize)]
pub struct DebugInfo {
    pub version: String,
    pub git_sha: String,
    pub environment: String,
    pub uptime_seconds: u64,
    pub database_status: String,
    pub timestamp: i64,
}

/// Process start time for uptime calculation
static START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

/// Pins the uptime origin; call once at startup.
pub fn mark_process_start() -> SystemTime {
    *once_cell::sync::Lazy::force(&START_TIME)
}

/// Handler for the /debug endpoint
pub async fn debug_handler(State(state): State<Arc<AppState>>) -> Json<DebugInfo> {
    let db_status = match state.shifts.ping().await {
        Ok(()) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    let uptime = START_TIME.elapsed().unwrap_or_default().as_secs();

    let info = DebugInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_sha: option_env!("GIT_SHA").unwrap_or("unknown").to_string(),
        environment: std::env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string()),
        uptime_seconds: uptime,
        database_status: db_status,
        timestamp: state.clock.now().timestamp(),
    };

    Json(info)
}
