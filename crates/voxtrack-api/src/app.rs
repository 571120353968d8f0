//! Application builder: wires router, middleware and state into an Axum app.

use axum::Router;
use tracing::info;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    info!(backend = state.store.backend(), "Building HTTP application");
    build_router(state)
}
