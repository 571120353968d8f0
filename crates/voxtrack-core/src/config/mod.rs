//! Application configuration schemas.
//!
//! The configuration is a JSON document deserialized via the `config`
//! crate, with an environment overlay for every key. Each sub-module
//! represents a logical configuration section.

pub mod database;
pub mod http;
pub mod logging;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use self::database::MongoConfig;
use self::http::HttpConfig;
use self::logging::LoggingConfig;

use crate::error::AppError;

/// Prefix of environment variables that override file settings,
/// e.g. `VOXTRACK__MONGO__URL`.
pub const ENV_PREFIX: &str = "VOXTRACK";

/// Root application configuration.
///
/// ```json
/// {
///     "http": { "host": "localhost", "port": 8080 },
///     "mongo": { "url": "mongodb://localhost", "db": "xmppvox" }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub http: HttpConfig,
    /// MongoDB connection settings.
    pub mongo: MongoConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a JSON file.
    ///
    /// Environment variables in the path are expanded and relative paths
    /// are resolved against the working directory. Variables prefixed with
    /// `VOXTRACK__` override the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = resolve_path(path.as_ref())?;
        if !path.is_file() {
            return Err(AppError::configuration(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let config = config::Config::builder()
            .add_source(config::File::new(
                &path.to_string_lossy(),
                config::FileFormat::Json,
            ))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from a JSON string without any overlay.
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Json))
            .build()?
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// The `host:port` address the HTTP server binds to.
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http.host, self.http.port)
    }
}

/// Expand environment variables in `path` and make it absolute.
pub fn resolve_path(path: &Path) -> Result<PathBuf, AppError> {
    let expanded = PathBuf::from(expand_env(&path.to_string_lossy()));
    if expanded.is_absolute() {
        return Ok(expanded);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(expanded))
}

/// Replace `$VAR` and `${VAR}` with the process environment's value.
///
/// Unset variables expand to the empty string.
pub fn expand_env(input: &str) -> String {
    expand_with(input, |name| std::env::var(name).ok())
}

/// Replace `$VAR` and `${VAR}` using `lookup` to resolve names.
pub fn expand_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let name: String = if chars.peek() == Some(&'{') {
            chars.next();
            let mut name = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                name.push(c);
            }
            name
        } else {
            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    name.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            if name.is_empty() {
                out.push('$');
                continue;
            }
            name
        };

        out.push_str(&lookup(&name).unwrap_or_default());
    }

    out
}
