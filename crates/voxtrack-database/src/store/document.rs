//! BSON document layouts for the `installations` and `sessions` collections.

use chrono::{DateTime, Utc};
use mongodb::bson;
use serde::{Deserialize, Serialize};

use voxtrack_core::error::AppError;
use voxtrack_core::result::AppResult;
use voxtrack_entity::installation::{Installation, InstallationInfo};
use voxtrack_entity::session::{RequestSnapshot, Session};

/// Stored form of an [`Installation`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallationDocument {
    #[serde(rename = "_id")]
    pub machine_id: String,
    #[serde(rename = "xmppvox_ver")]
    pub xmppvox_version: String,
    pub dosvox_info: Option<InstallationInfo>,
    pub machine_info: Option<InstallationInfo>,
    pub created_at: bson::DateTime,
}

impl From<&Installation> for InstallationDocument {
    fn from(installation: &Installation) -> Self {
        Self {
            machine_id: installation.machine_id.clone(),
            xmppvox_version: installation.xmppvox_version.clone(),
            dosvox_info: installation.dosvox_info.clone(),
            machine_info: installation.machine_info.clone(),
            created_at: to_bson_datetime(installation.created_at),
        }
    }
}

impl From<InstallationDocument> for Installation {
    fn from(doc: InstallationDocument) -> Self {
        Self {
            machine_id: doc.machine_id,
            xmppvox_version: doc.xmppvox_version,
            dosvox_info: doc.dosvox_info,
            machine_info: doc.machine_info,
            created_at: from_bson_datetime(doc.created_at),
        }
    }
}

/// Stored form of a [`Session`].
///
/// Unset timestamps are stored as `null` so that `{closed_at: null}`
/// selects open sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub created_at: bson::DateTime,
    pub closed_at: Option<bson::DateTime>,
    pub last_ping: Option<bson::DateTime>,
    pub jid: String,
    pub machine_id: String,
    #[serde(rename = "xmppvox_ver")]
    pub xmppvox_version: String,
    #[serde(rename = "req")]
    pub request: Option<RequestSnapshot>,
}

impl From<&Session> for SessionDocument {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.to_string(),
            created_at: to_bson_datetime(session.created_at),
            closed_at: session.closed_at.map(to_bson_datetime),
            last_ping: session.last_ping.map(to_bson_datetime),
            jid: session.jid.clone(),
            machine_id: session.machine_id.clone(),
            xmppvox_version: session.xmppvox_version.clone(),
            request: session.request.clone(),
        }
    }
}

impl TryFrom<SessionDocument> for Session {
    type Error = AppError;

    fn try_from(doc: SessionDocument) -> AppResult<Self> {
        let id = doc.id.parse().map_err(|_| {
            AppError::internal(format!("Stored session has a malformed id: {}", doc.id))
        })?;

        Ok(Self {
            id,
            created_at: from_bson_datetime(doc.created_at),
            closed_at: doc.closed_at.map(from_bson_datetime),
            last_ping: doc.last_ping.map(from_bson_datetime),
            jid: doc.jid,
            machine_id: doc.machine_id,
            xmppvox_version: doc.xmppvox_version,
            request: doc.request,
        })
    }
}

/// BSON dates carry millisecond precision; finer digits are dropped.
pub fn to_bson_datetime(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

pub fn from_bson_datetime(dt: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}
