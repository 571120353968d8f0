//! Installation entity model.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-form string mapping describing a host environment or client subsystem.
pub type InstallationInfo = HashMap<String, String>;

/// One tracked XMPPVOX installation, keyed by machine id.
///
/// Created once on first registration and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installation {
    /// Client-supplied machine identifier (unique key).
    pub machine_id: String,
    /// XMPPVOX version that registered the installation.
    pub xmppvox_version: String,
    /// DOSVOX details reported by the client (`None` when submitted as `null`).
    pub dosvox_info: Option<InstallationInfo>,
    /// Host operating system details (`None` when submitted as `null`).
    pub machine_info: Option<InstallationInfo>,
    /// When the installation was registered.
    pub created_at: DateTime<Utc>,
}

impl Installation {
    /// Build a new installation record stamped with the current time.
    pub fn new(
        machine_id: impl Into<String>,
        xmppvox_version: impl Into<String>,
        dosvox_info: Option<InstallationInfo>,
        machine_info: Option<InstallationInfo>,
    ) -> Self {
        Self {
            machine_id: machine_id.into(),
            xmppvox_version: xmppvox_version.into(),
            dosvox_info,
            machine_info,
            created_at: Utc::now(),
        }
    }

    /// Parse an info field submitted as JSON.
    ///
    /// Accepts an object of string values or the literal `null`.
    pub fn parse_info(raw: &str) -> Result<Option<InstallationInfo>, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
