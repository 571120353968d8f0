//! Route definitions for the voxtrack HTTP API.
//!
//! Health routes live at the root; the tracking endpoints are mounted
//! under the API version prefix.

use axum::{Router, middleware as axum_middleware, routing::get, routing::post};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Path prefix of the current API version.
pub const API_VERSION_PREFIX: &str = "/1";

/// Build the complete Axum router.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(installation_routes())
        .merge(session_routes());

    Router::new()
        .merge(health_routes())
        .nest(API_VERSION_PREFIX, api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Liveness and uptime
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::health::liveness))
        .route("/uptime", get(handlers::health::uptime))
}

fn installation_routes() -> Router<AppState> {
    Router::new().route(
        "/installation/new",
        post(handlers::installation::new_installation),
    )
}

/// Session lifecycle: open, close, keep-alive
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/session/new", post(handlers::session::new_session))
        .route("/session/close", post(handlers::session::close_session))
        .route("/session/ping", post(handlers::session::ping_session))
}
