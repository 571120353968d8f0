//! Health check handlers.

use std::time::Duration;

use axum::extract::State;

use crate::state::AppState;

/// GET /
pub async fn liveness() -> &'static str {
    "API OK\n"
}

/// GET /uptime
pub async fn uptime(State(state): State<AppState>) -> String {
    format!(
        "API uptime: {}\n",
        format_uptime(state.started_at.elapsed())
    )
}

/// Render a duration as `{days}d{hours:02}h{minutes:02}m{seconds:02}s`.
pub fn format_uptime(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let (mins, hours) = (secs / 60, secs / 3600);
    format!(
        "{}d{:02}h{:02}m{:02}s",
        hours / 24,
        hours % 24,
        mins % 60,
        secs % 60
    )
}
