//! Usage store trait and the composition-time dispatcher.

use async_trait::async_trait;

use voxtrack_core::result::AppResult;
use voxtrack_core::types::SessionId;
use voxtrack_entity::installation::Installation;
use voxtrack_entity::session::Session;

use super::memory::MemoryUsageStore;
use super::mongo::MongoUsageStore;

/// Capability interface over installation and session storage.
///
/// Every mutation is a single atomic operation against the backing store;
/// implementations never retry and never hold authoritative copies.
#[async_trait]
pub trait UsageStore: Send + Sync + std::fmt::Debug {
    /// Persist a new installation.
    ///
    /// Fails with `Conflict` when an installation with the same machine id
    /// exists; the stored record is left untouched.
    async fn insert_installation(&self, installation: &Installation) -> AppResult<()>;

    /// Persist a new session.
    async fn insert_session(&self, session: &Session) -> AppResult<()>;

    /// Set `closed_at` on the open session `id` owned by `machine_id`.
    ///
    /// Fails with `NotFound` when no open session with that id and owner
    /// exists. Unknown id, wrong owner and already closed are not told apart.
    async fn close_session(&self, id: &SessionId, machine_id: &str) -> AppResult<()>;

    /// Set `last_ping` on the open session `id` owned by `machine_id`.
    ///
    /// Same matching rule and failure as [`UsageStore::close_session`].
    async fn ping_session(&self, id: &SessionId, machine_id: &str) -> AppResult<()>;

    /// Look up an installation by machine id.
    async fn find_installation(&self, machine_id: &str) -> AppResult<Option<Installation>>;

    /// Look up a session by id.
    async fn find_session(&self, id: &SessionId) -> AppResult<Option<Session>>;

    /// Best-effort attempt to re-establish connectivity after a failure.
    async fn refresh(&self) -> AppResult<()>;
}

/// Dispatcher over the available store backends.
///
/// The backend is chosen when the application is composed: MongoDB for
/// the server, memory for tests. Cloning is cheap and every request works
/// on its own clone.
#[derive(Debug, Clone)]
pub enum StoreDispatch {
    /// MongoDB-backed store.
    Mongo(MongoUsageStore),
    /// In-memory store.
    Memory(MemoryUsageStore),
}

impl StoreDispatch {
    /// Short backend name for logs.
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Mongo(_) => "mongo",
            Self::Memory(_) => "memory",
        }
    }
}

impl From<MongoUsageStore> for StoreDispatch {
    fn from(store: MongoUsageStore) -> Self {
        Self::Mongo(store)
    }
}

impl From<MemoryUsageStore> for StoreDispatch {
    fn from(store: MemoryUsageStore) -> Self {
        Self::Memory(store)
    }
}

#[async_trait]
impl UsageStore for StoreDispatch {
    async fn insert_installation(&self, installation: &Installation) -> AppResult<()> {
        match self {
            Self::Mongo(inner) => inner.insert_installation(installation).await,
            Self::Memory(inner) => inner.insert_installation(installation).await,
        }
    }

    async fn insert_session(&self, session: &Session) -> AppResult<()> {
        match self {
            Self::Mongo(inner) => inner.insert_session(session).await,
            Self::Memory(inner) => inner.insert_session(session).await,
        }
    }

    async fn close_session(&self, id: &SessionId, machine_id: &str) -> AppResult<()> {
        match self {
            Self::Mongo(inner) => inner.close_session(id, machine_id).await,
            Self::Memory(inner) => inner.close_session(id, machine_id).await,
        }
    }

    async fn ping_session(&self, id: &SessionId, machine_id: &str) -> AppResult<()> {
        match self {
            Self::Mongo(inner) => inner.ping_session(id, machine_id).await,
            Self::Memory(inner) => inner.ping_session(id, machine_id).await,
        }
    }

    async fn find_installation(&self, machine_id: &str) -> AppResult<Option<Installation>> {
        match self {
            Self::Mongo(inner) => inner.find_installation(machine_id).await,
            Self::Memory(inner) => inner.find_installation(machine_id).await,
        }
    }

    async fn find_session(&self, id: &SessionId) -> AppResult<Option<Session>> {
        match self {
            Self::Mongo(inner) => inner.find_session(id).await,
            Self::Memory(inner) => inner.find_session(id).await,
        }
    }

    async fn refresh(&self) -> AppResult<()> {
        match self {
            Self::Mongo(inner) => inner.refresh().await,
            Self::Memory(inner) => inner.refresh().await,
        }
    }
}
