//! Logging setup.
//!
//! Installs a `tracing` subscriber with a console layer and, when a log
//! directory is configured, a daily-rotating file layer. `RUST_LOG` takes
//! precedence over the configured level.

use std::fs;
use std::sync::Mutex;

use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Prefix of rotated log files (`app.YYYY-MM-DD.log`).
pub const LOG_FILE_PREFIX: &str = "app";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Installs the global subscriber described by `config`.
///
/// Fails if a global subscriber is already set or the log directory cannot
/// be created.
pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let mut layers: Vec<BoxedLayer> = Vec::new();

    layers.push(if config.json {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer().with_target(true).boxed()
    });

    let file_appender = file_appender(config)?;
    let logs_to_file = file_appender.is_some();
    if let Some(appender) = file_appender {
        let writer = Mutex::new(appender);
        layers.push(if config.json {
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed()
        } else {
            fmt::layer().with_ansi(false).with_writer(writer).boxed()
        });
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()?;

    info!(
        level = %config.level,
        log_dir = ?config.directory,
        logs_to_file,
        "Logging setup complete"
    );
    Ok(())
}

/// Builds the rotating file appender, creating the log directory first.
/// Returns `None` when no directory is configured.
pub fn file_appender(config: &LoggingConfig) -> anyhow::Result<Option<RollingFileAppender>> {
    let Some(dir) = &config.directory else {
        return Ok(None);
    };

    fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(config.max_files.max(1))
        .build(dir)?;

    Ok(Some(appender))
}
