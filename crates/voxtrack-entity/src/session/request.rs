//! Diagnostic snapshot of the HTTP request that opened a session.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Multi-valued string mapping, as used by HTTP headers and form fields.
pub type MultiMap = BTreeMap<String, Vec<String>>;

/// Subset of an HTTP request kept alongside a session for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestSnapshot {
    /// HTTP method.
    pub method: String,
    /// Request URL (path and query as received).
    pub url: String,
    /// Request headers; values that are not valid UTF-8 are skipped.
    pub headers: MultiMap,
    /// `Host` the client addressed.
    pub host: String,
    /// Submitted form values.
    pub form: MultiMap,
    /// Peer address, when the server tracks connection info.
    pub remote_addr: Option<String>,
}

impl RequestSnapshot {
    /// Attach the submitted form pairs, preserving repeated names.
    pub fn with_form<'a>(mut self, pairs: impl IntoIterator<Item = &'a (String, String)>) -> Self {
        for (name, value) in pairs {
            self.form.entry(name.clone()).or_default().push(value.clone());
        }
        self
    }
}
