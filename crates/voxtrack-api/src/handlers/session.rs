//! Session handlers: open, close and keep-alive.
//!
//! Close and ping only touch an open session owned by the submitting
//! machine. An unknown id, a wrong owner and an already closed session all
//! get the same answer.

use tracing::{debug, info};

use voxtrack_core::error::{AppError, ErrorKind};
use voxtrack_core::types::SessionId;
use voxtrack_database::store::UsageStore;
use voxtrack_entity::session::Session;

use crate::dto::{NewSessionForm, SessionUpdateForm};
use crate::error::ApiError;
use crate::extractors::{RequestMeta, RequestStore, StrictForm};

/// POST /1/session/new
///
/// Responds with the new session id on the first line.
pub async fn new_session(
    store: RequestStore,
    meta: RequestMeta,
    form: StrictForm<NewSessionForm>,
) -> Result<String, ApiError> {
    let snapshot = meta.into_snapshot(&form.pairs);
    let NewSessionForm {
        jid,
        machine_id,
        xmppvox_version,
    } = form.value;

    let session = Session::new(jid, machine_id, xmppvox_version, Some(snapshot));

    store
        .insert_session(&session)
        .await
        .map_err(|e| store.reject(e, "Failed to create a new session"))?;

    info!(session_id = %session.id, machine_id = %session.machine_id, "Session opened");
    Ok(format!("{}\n", session.id))
}

/// POST /1/session/close
pub async fn close_session(
    store: RequestStore,
    form: StrictForm<SessionUpdateForm>,
) -> Result<String, ApiError> {
    update_session(&store, form.value, SessionUpdate::Close).await
}

/// POST /1/session/ping
pub async fn ping_session(
    store: RequestStore,
    form: StrictForm<SessionUpdateForm>,
) -> Result<String, ApiError> {
    update_session(&store, form.value, SessionUpdate::Ping).await
}

#[derive(Debug, Clone, Copy)]
enum SessionUpdate {
    Close,
    Ping,
}

impl SessionUpdate {
    fn failure_message(self, raw_id: &str) -> String {
        match self {
            Self::Close => format!("Failed to close session {raw_id}"),
            Self::Ping => format!("Failed to ping session {raw_id}"),
        }
    }
}

async fn update_session(
    store: &RequestStore,
    form: SessionUpdateForm,
    update: SessionUpdate,
) -> Result<String, ApiError> {
    let raw_id = form.session_id;
    let id: SessionId = raw_id.parse()?;

    let result = match update {
        SessionUpdate::Close => store.close_session(&id, &form.machine_id).await,
        SessionUpdate::Ping => store.ping_session(&id, &form.machine_id).await,
    };

    match result {
        Ok(()) => {
            debug!(session_id = %id, ?update, "Session updated");
            Ok(format!("{raw_id}\n"))
        }
        Err(e) if e.kind == ErrorKind::NotFound => Err(AppError::not_found(format!(
            "Session {raw_id} does not exist or is already closed"
        ))
        .into()),
        Err(e) => Err(store.reject(e, update.failure_message(&raw_id))),
    }
}
