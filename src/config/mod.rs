//! Configuration module for the employee directory.
//!
//! This module handles loading the application configuration from a YAML
//! file layered with environment overrides.
//!
//! # Example
//!
//! ```no_run
//! use employee_directory::config::ConfigLoader;
//!
//! let config = ConfigLoader::from_env()?.into_config();
//! println!("Database: {}", config.database.url);
//! # Ok::<(), employee_directory::error::DirectoryError>(())
//! ```

mod loader;
mod types;

pub use loader::{CONFIG_PATH_VAR, ConfigLoader};
pub use types::{AppConfig, DatabaseConfig, LoggingConfig, ServerConfig, UploadConfig};
