//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the
//! application configuration from a YAML file and the process environment.

use std::fs;
use std::path::Path;

use crate::error::{DirectoryError, DirectoryResult};

use super::types::AppConfig;

/// Environment variable naming the YAML configuration file.
pub const CONFIG_PATH_VAR: &str = "EMPLOYEE_DIRECTORY_CONFIG";

/// Loads and provides access to the application configuration.
///
/// Configuration is layered: built-in defaults, then the YAML file, then
/// individual environment variables:
///
/// ```text
/// DATABASE_URL           database.url
/// DATABASE_MAX_CONNECTIONS database.max_connections
/// UPLOAD_FOLDER          uploads.directory
/// BIND_ADDR              server.bind_addr
/// SESSION_COOKIE_SECURE  server.session_cookie_secure
/// LOG_LEVEL              logging.level
/// LOG_DIR                logging.directory
/// ```
///
/// # Example
///
/// ```no_run
/// use employee_directory::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/employee_directory.yaml")?;
/// println!("Listening on {}", loader.config().server.bind_addr);
/// # Ok::<(), employee_directory::error::DirectoryError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Loads configuration from the YAML file at `path`.
    ///
    /// Returns `ConfigNotFound` if the file cannot be read and
    /// `ConfigParseError` if it is not valid YAML for [`AppConfig`].
    pub fn load<P: AsRef<Path>>(path: P) -> DirectoryResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| DirectoryError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let config = Self::parse_yaml(&content, &path_str)?;
        Ok(Self { config })
    }

    /// Loads configuration for the running process.
    ///
    /// Reads `.env` if present, then the file named by
    /// [`CONFIG_PATH_VAR`] (defaults when unset), then applies environment
    /// overrides.
    pub fn from_env() -> DirectoryResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ConfigLoader::from_env`] but reads variables through
    /// `lookup`, without touching `.env`.
    pub fn from_lookup<F>(lookup: F) -> DirectoryResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut loader = match lookup(CONFIG_PATH_VAR) {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        loader.apply_overrides(lookup)?;
        Ok(loader)
    }

    fn parse_yaml(content: &str, origin: &str) -> DirectoryResult<AppConfig> {
        if content.trim().is_empty() {
            return Ok(AppConfig::default());
        }
        serde_yaml::from_str(content).map_err(|e| DirectoryError::ConfigParseError {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Applies environment overrides on top of the loaded file.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> DirectoryResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = &mut self.config;

        if let Some(url) = lookup("DATABASE_URL") {
            config.database.url = url;
        }
        if let Some(raw) = lookup("DATABASE_MAX_CONNECTIONS") {
            config.database.max_connections =
                raw.trim()
                    .parse()
                    .map_err(|_| DirectoryError::ConfigParseError {
                        path: "DATABASE_MAX_CONNECTIONS".to_string(),
                        message: format!("expected a positive integer, got '{}'", raw),
                    })?;
        }
        if let Some(dir) = lookup("UPLOAD_FOLDER") {
            config.uploads.directory = dir.into();
        }
        if let Some(addr) = lookup("BIND_ADDR") {
            config.server.bind_addr = addr;
        }
        if let Some(secure) = lookup("SESSION_COOKIE_SECURE") {
            config.server.session_cookie_secure = secure.trim().eq_ignore_ascii_case("true");
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(dir) = lookup("LOG_DIR") {
            config.logging.directory = if dir.trim().is_empty() {
                None
            } else {
                Some(dir.into())
            };
        }

        Ok(())
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> AppConfig {
        self.config
    }
}
