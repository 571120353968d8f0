//! In-memory usage store using a Tokio mutex, for tests and local runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use voxtrack_core::error::AppError;
use voxtrack_core::result::AppResult;
use voxtrack_core::types::SessionId;
use voxtrack_entity::installation::Installation;
use voxtrack_entity::session::Session;

use super::gateway::UsageStore;

/// Internal state for the memory store.
#[derive(Debug, Default)]
struct InnerState {
    /// Installations keyed by machine id.
    installations: HashMap<String, Installation>,
    /// Sessions keyed by id.
    sessions: HashMap<SessionId, Session>,
    /// When false every operation fails as if the database were unreachable.
    available: bool,
    /// Number of `refresh` calls seen.
    refreshes: u64,
}

/// In-memory usage store.
///
/// Every operation runs under a single lock, which gives the same
/// conditional-update atomicity as the database backend.
#[derive(Debug, Clone)]
pub struct MemoryUsageStore {
    state: Arc<Mutex<InnerState>>,
}

impl Default for MemoryUsageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryUsageStore {
    /// Create an empty, available store.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(InnerState {
                available: true,
                ..InnerState::default()
            })),
        }
    }

    /// Number of stored installations.
    pub async fn installation_count(&self) -> usize {
        self.state.lock().await.installations.len()
    }

    /// Number of stored sessions, open or closed.
    pub async fn session_count(&self) -> usize {
        self.state.lock().await.sessions.len()
    }

    /// Simulate the backing database going away or coming back.
    pub async fn set_available(&self, available: bool) {
        self.state.lock().await.available = available;
    }

    /// Number of times `refresh` has been called.
    pub async fn refresh_count(&self) -> u64 {
        self.state.lock().await.refreshes
    }

    fn stamp_open_session<F>(
        state: &mut InnerState,
        id: &SessionId,
        machine_id: &str,
        stamp: F,
    ) -> AppResult<()>
    where
        F: FnOnce(&mut Session),
    {
        ensure_available(state)?;
        match state.sessions.get_mut(id) {
            Some(session) if session.accepts_update_from(machine_id) => {
                stamp(session);
                Ok(())
            }
            _ => Err(AppError::not_found(format!(
                "Session {id} does not exist or is already closed"
            ))),
        }
    }
}

fn ensure_available(state: &InnerState) -> AppResult<()> {
    if state.available {
        Ok(())
    } else {
        Err(AppError::database("Memory store is unavailable"))
    }
}

#[async_trait]
impl UsageStore for MemoryUsageStore {
    async fn insert_installation(&self, installation: &Installation) -> AppResult<()> {
        let mut state = self.state.lock().await;
        ensure_available(&state)?;

        if state.installations.contains_key(&installation.machine_id) {
            return Err(AppError::conflict("Installation already registered"));
        }
        state
            .installations
            .insert(installation.machine_id.clone(), installation.clone());
        debug!(machine_id = %installation.machine_id, "Installation stored");
        Ok(())
    }

    async fn insert_session(&self, session: &Session) -> AppResult<()> {
        let mut state = self.state.lock().await;
        ensure_available(&state)?;

        if state.sessions.contains_key(&session.id) {
            return Err(AppError::database(format!(
                "Duplicate session id {}",
                session.id
            )));
        }
        state.sessions.insert(session.id, session.clone());
        debug!(session_id = %session.id, "Session stored");
        Ok(())
    }

    async fn close_session(&self, id: &SessionId, machine_id: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        Self::stamp_open_session(&mut state, id, machine_id, |session| {
            session.closed_at = Some(Utc::now());
        })
    }

    async fn ping_session(&self, id: &SessionId, machine_id: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        Self::stamp_open_session(&mut state, id, machine_id, |session| {
            session.last_ping = Some(Utc::now());
        })
    }

    async fn find_installation(&self, machine_id: &str) -> AppResult<Option<Installation>> {
        let state = self.state.lock().await;
        ensure_available(&state)?;
        Ok(state.installations.get(machine_id).cloned())
    }

    async fn find_session(&self, id: &SessionId) -> AppResult<Option<Session>> {
        let state = self.state.lock().await;
        ensure_available(&state)?;
        Ok(state.sessions.get(id).cloned())
    }

    async fn refresh(&self) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.refreshes += 1;
        info!(refreshes = state.refreshes, "Memory store refresh requested");
        ensure_available(&state)
    }
}
