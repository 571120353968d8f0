//! Newtype wrapper around [`uuid::Uuid`] for session identifiers.
//!
//! Session ids travel as plain strings in form fields and response bodies;
//! parsing through [`SessionId::from_str`] is what rejects malformed ids
//! before any store access. Only the lowercase hyphenated form is accepted,
//! so every session has exactly one spelling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Unique identifier for a usage session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::validation(format!("Invalid session id {s}"));
        let uuid = Uuid::parse_str(s).map_err(|_| invalid())?;
        // Braced, URN and simple forms parse too; only the hyphenated form is canonical.
        if uuid.hyphenated().to_string() != s {
            return Err(invalid());
        }
        Ok(Self(uuid))
    }
}
