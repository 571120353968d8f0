//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use voxtrack_core::types::SessionId;

use super::request::RequestSnapshot;

/// One usage period of the XMPPVOX client.
///
/// A session is open until `closed_at` is set; closing is terminal.
/// Pings only advance `last_ping` while the session is open, and only the
/// machine that opened the session may close or ping it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier.
    pub id: SessionId,
    /// When the session was opened.
    pub created_at: DateTime<Utc>,
    /// When the session was closed (`None` while open).
    pub closed_at: Option<DateTime<Utc>>,
    /// Last keep-alive ping (`None` if never pinged).
    pub last_ping: Option<DateTime<Utc>>,
    /// The user's XMPP identifier.
    pub jid: String,
    /// Machine that opened the session; doubles as the ownership token.
    pub machine_id: String,
    /// Client version.
    pub xmppvox_version: String,
    /// Snapshot of the request that opened the session.
    pub request: Option<RequestSnapshot>,
}

impl Session {
    /// Open a new session with a fresh id.
    pub fn new(
        jid: impl Into<String>,
        machine_id: impl Into<String>,
        xmppvox_version: impl Into<String>,
        request: Option<RequestSnapshot>,
    ) -> Self {
        Self {
            id: SessionId::new(),
            created_at: Utc::now(),
            closed_at: None,
            last_ping: None,
            jid: jid.into(),
            machine_id: machine_id.into(),
            xmppvox_version: xmppvox_version.into(),
            request,
        }
    }

    /// Check whether the session is still open.
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }

    /// Check whether `machine_id` opened this session.
    pub fn is_owned_by(&self, machine_id: &str) -> bool {
        self.machine_id == machine_id
    }

    /// Whether a close or ping from `machine_id` may touch this session.
    pub fn accepts_update_from(&self, machine_id: &str) -> bool {
        self.is_open() && self.is_owned_by(machine_id)
    }
}
