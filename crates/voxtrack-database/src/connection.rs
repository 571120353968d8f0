//! MongoDB client management.

use std::time::Duration;

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use tracing::{info, warn};

use voxtrack_core::config::database::MongoConfig;
use voxtrack_core::error::{AppError, ErrorKind};

/// Application name reported to the server in the handshake.
const APP_NAME: &str = "voxtrack";

/// A live MongoDB client with the configured database selected.
///
/// The driver keeps its own connection pool behind the client; cloning the
/// connection or the [`Database`] handle shares that pool.
#[derive(Debug, Clone)]
pub struct MongoConnection {
    client: Client,
    database: Database,
}

impl MongoConnection {
    /// Connect to MongoDB and verify the server answers.
    ///
    /// Connect and server-selection timeouts are both set to
    /// `connect_timeout_seconds`, so an unreachable server fails fast.
    pub async fn connect(config: &MongoConfig) -> Result<Self, AppError> {
        info!(
            url = %mask_password(&config.url),
            db = %config.db,
            timeout_seconds = config.connect_timeout_seconds,
            "Connecting to MongoDB"
        );

        let timeout = Duration::from_secs(config.connect_timeout_seconds);
        let mut options = ClientOptions::parse(&config.url).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid MongoDB URL: {e}"),
                e,
            )
        })?;
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);
        options
            .app_name
            .get_or_insert_with(|| APP_NAME.to_string());

        let client = Client::with_options(options).map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to create MongoDB client: {e}"),
                e,
            )
        })?;
        let database = client.database(&config.db);

        let connection = Self { client, database };
        connection.health_check().await?;

        info!("Successfully connected to MongoDB");
        Ok(connection)
    }

    /// Return a handle to the selected database.
    pub fn database(&self) -> Database {
        self.database.clone()
    }

    /// Check database connectivity with a `ping` command.
    pub async fn health_check(&self) -> Result<(), AppError> {
        ping(&self.database).await
    }

    /// Shut the client down, waiting for in-flight operations.
    pub async fn close(self) {
        self.client.shutdown().await;
        info!("MongoDB client closed");
    }
}

/// Run a `ping` against `database`.
///
/// Besides checking liveness this makes the driver re-run server selection,
/// which is how a dropped connection gets re-established.
pub(crate) async fn ping(database: &Database) -> Result<(), AppError> {
    database
        .run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
        .map_err(|e| {
            warn!(error = %e, "MongoDB ping failed");
            AppError::with_source(ErrorKind::Database, "MongoDB ping failed", e)
        })
}

/// Mask the password portion of a connection URL for safe logging.
fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
            if colon_pos > scheme_end {
                return format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..]);
            }
        }
    }
    url.to_string()
}
