//! Configuration types for the employee directory.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file. Every section has
//! defaults, so an empty file is a valid configuration.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Record store settings.
    pub database: DatabaseConfig,
    /// Profile picture upload settings.
    pub uploads: UploadConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind_addr: String,
    /// Directory holding bundled static assets.
    pub static_dir: PathBuf,
    /// Whether the notice cookie carries the `Secure` attribute.
    pub session_cookie_secure: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            static_dir: PathBuf::from("static"),
            session_cookie_secure: false,
        }
    }
}

/// Record store settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite connection URL.
    pub url: String,
    /// Maximum pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://employee_directory.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Profile picture upload settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory uploaded pictures are written to.
    pub directory: PathBuf,
    /// Accepted file extensions, compared case-insensitively.
    pub allowed_extensions: Vec<String>,
    /// Largest accepted request body, in bytes.
    pub max_file_size: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("static/uploads"),
            allowed_extensions: vec!["png".to_string(), "jpg".to_string(), "jpeg".to_string()],
            max_file_size: 5 * 1024 * 1024,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Directory for rotating log files; console only when absent.
    pub directory: Option<PathBuf>,
    /// Number of rotated log files to keep.
    pub max_files: usize,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: Some(PathBuf::from("logs")),
            max_files: 3,
            json: false,
        }
    }
}
