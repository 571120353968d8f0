//! Application state shared across all handlers and middleware.

use std::time::Instant;

use voxtrack_database::store::StoreDispatch;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>` or through the
/// custom extractors. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Usage store with the target database already selected
    pub store: StoreDispatch,
    /// Instant the router was built, for `/uptime`
    pub started_at: Instant,
}

impl AppState {
    /// Creates the state, stamping the start instant now.
    pub fn new(store: impl Into<StoreDispatch>) -> Self {
        Self {
            store: store.into(),
            started_at: Instant::now(),
        }
    }
}
