//! Request forms with validation.
//!
//! Every field is required and must be non-empty. The accepted field set
//! of each form is listed in its [`FormFields`] impl.

use serde::Deserialize;
use validator::Validate;

use crate::extractors::FormFields;

/// `POST /1/installation/new`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewInstallationForm {
    #[validate(length(min = 1))]
    pub machine_id: String,
    #[validate(length(min = 1))]
    pub xmppvox_version: String,
    /// JSON object of strings, or `null`.
    #[validate(length(min = 1))]
    pub dosvox_info: String,
    /// JSON object of strings, or `null`.
    #[validate(length(min = 1))]
    pub machine_info: String,
}

impl FormFields for NewInstallationForm {
    const FIELDS: &'static [&'static str] =
        &["machine_id", "xmppvox_version", "dosvox_info", "machine_info"];
}

/// `POST /1/session/new`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewSessionForm {
    /// XMPP address of the user.
    #[validate(length(min = 1))]
    pub jid: String,
    #[validate(length(min = 1))]
    pub machine_id: String,
    #[validate(length(min = 1))]
    pub xmppvox_version: String,
}

impl FormFields for NewSessionForm {
    const FIELDS: &'static [&'static str] = &["jid", "machine_id", "xmppvox_version"];
}

/// `POST /1/session/close` and `POST /1/session/ping`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SessionUpdateForm {
    #[validate(length(min = 1))]
    pub session_id: String,
    /// Must match the machine that opened the session.
    #[validate(length(min = 1))]
    pub machine_id: String,
}

impl FormFields for SessionUpdateForm {
    const FIELDS: &'static [&'static str] = &["session_id", "machine_id"];
}
