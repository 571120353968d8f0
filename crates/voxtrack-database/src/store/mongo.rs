//! MongoDB-backed usage store.

use async_trait::async_trait;
use mongodb::bson::{self, Document, doc};
use mongodb::error::{Error as MongoError, ErrorKind as MongoErrorKind, WriteFailure};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use tracing::{debug, info};

use voxtrack_core::error::{AppError, ErrorKind};
use voxtrack_core::result::AppResult;
use voxtrack_core::types::SessionId;
use voxtrack_entity::installation::Installation;
use voxtrack_entity::session::Session;

use super::document::{InstallationDocument, SessionDocument};
use super::gateway::UsageStore;
use super::{INSTALLATIONS, SESSIONS};
use crate::connection::{self, MongoConnection};

/// Server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Usage store over the `installations` and `sessions` collections.
#[derive(Debug, Clone)]
pub struct MongoUsageStore {
    database: Database,
}

impl MongoUsageStore {
    /// Create a store on the connection's selected database.
    pub fn new(connection: &MongoConnection) -> Self {
        Self {
            database: connection.database(),
        }
    }

    fn installations(&self) -> Collection<InstallationDocument> {
        self.database.collection(INSTALLATIONS)
    }

    fn sessions(&self) -> Collection<SessionDocument> {
        self.database.collection(SESSIONS)
    }

    /// Stamp `field` with the current time on an open session owned by
    /// `machine_id`, in a single `findAndModify`.
    async fn stamp_open_session(
        &self,
        id: &SessionId,
        machine_id: &str,
        field: &str,
    ) -> AppResult<()> {
        let updated = self
            .sessions()
            .find_one_and_update(open_session_filter(id, machine_id), stamp_update(field))
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| database_error(&format!("Failed to update {field} on session {id}"), e))?;

        match updated {
            Some(_) => {
                debug!(session_id = %id, field, "Session updated");
                Ok(())
            }
            None => Err(AppError::not_found(format!(
                "Session {id} does not exist or is already closed"
            ))),
        }
    }
}

#[async_trait]
impl UsageStore for MongoUsageStore {
    async fn insert_installation(&self, installation: &Installation) -> AppResult<()> {
        self.installations()
            .insert_one(InstallationDocument::from(installation))
            .await
            .map_err(|e| insert_installation_error(&installation.machine_id, e))?;
        Ok(())
    }

    async fn insert_session(&self, session: &Session) -> AppResult<()> {
        self.sessions()
            .insert_one(SessionDocument::from(session))
            .await
            .map_err(|e| database_error(&format!("Failed to insert session {}", session.id), e))?;
        Ok(())
    }

    async fn close_session(&self, id: &SessionId, machine_id: &str) -> AppResult<()> {
        self.stamp_open_session(id, machine_id, "closed_at").await
    }

    async fn ping_session(&self, id: &SessionId, machine_id: &str) -> AppResult<()> {
        self.stamp_open_session(id, machine_id, "last_ping").await
    }

    async fn find_installation(&self, machine_id: &str) -> AppResult<Option<Installation>> {
        let found = self
            .installations()
            .find_one(doc! { "_id": machine_id })
            .await
            .map_err(|e| database_error(&format!("Failed to find installation {machine_id}"), e))?;
        Ok(found.map(Installation::from))
    }

    async fn find_session(&self, id: &SessionId) -> AppResult<Option<Session>> {
        let found = self
            .sessions()
            .find_one(doc! { "_id": id.to_string() })
            .await
            .map_err(|e| database_error(&format!("Failed to find session {id}"), e))?;
        found.map(Session::try_from).transpose()
    }

    async fn refresh(&self) -> AppResult<()> {
        connection::ping(&self.database).await?;
        info!("MongoDB connection refreshed");
        Ok(())
    }
}

/// Matches the open session `id` owned by `machine_id`.
fn open_session_filter(id: &SessionId, machine_id: &str) -> Document {
    doc! {
        "_id": id.to_string(),
        "machine_id": machine_id,
        "closed_at": null,
    }
}

/// Sets `field` to the current time.
fn stamp_update(field: &str) -> Document {
    doc! { "$set": { field: bson::DateTime::now() } }
}

fn insert_installation_error(machine_id: &str, err: MongoError) -> AppError {
    if is_duplicate_key(&err) {
        AppError::conflict("Installation already registered")
    } else {
        database_error(&format!("Failed to insert installation {machine_id}"), err)
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        MongoErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

fn database_error(context: &str, err: MongoError) -> AppError {
    AppError::with_source(ErrorKind::Database, format!("{context}: {err}"), err)
}
