//! MongoDB configuration.

use serde::{Deserialize, Serialize};

/// MongoDB connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    /// MongoDB connection string, e.g. `mongodb://localhost:27017`.
    pub url: String,
    /// Name of the database holding the `installations` and `sessions` collections.
    pub db: String,
    /// Connect and server-selection timeout in seconds.
    ///
    /// Kept short so an unreachable server fails startup and requests early.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

fn default_connect_timeout() -> u64 {
    5
}
