//! Structured logging via `tracing`.
//!
//! The terminal is owned by the globe UI, so log lines never go to stdout
//! or stderr. They go to the configured log file, or nowhere.

use std::fs::File;
use std::sync::Mutex;

use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use crate::config::DebugConfig;

pub const DEFAULT_FILTER: &str = "info";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to open log file: {0}")]
    LogFile(#[from] std::io::Error),

    #[error("failed to install subscriber: {0}")]
    Install(#[from] TryInitError),
}

/// Filter from RUST_LOG, else the configured level, else [`DEFAULT_FILTER`].
pub fn env_filter(config: &DebugConfig) -> EnvFilter {
    let level = if config.log_level.trim().is_empty() {
        DEFAULT_FILTER
    } else {
        config.log_level.as_str()
    };
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Fails when the log file cannot be
/// created or a global subscriber is already set.
pub fn init_logging(config: &DebugConfig) -> Result<(), LoggingError> {
    let filter = env_filter(config);

    let Some(ref path) = config.log_file else {
        // Keep the filter so `enabled!` checks stay cheap.
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::sink))
            .try_init()?;
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::uptime()),
        )
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_level_is_used() {
        let config = DebugConfig {
            log_level: "warn,tui_globe=debug".to_string(),
            log_file: None,
        };
        if std::env::var("RUST_LOG").is_err() {
            let filter = format!("{}", env_filter(&config));
            assert!(filter.contains("tui_globe=debug"));
        }
    }

    #[test]
    fn test_invalid_level_falls_back() {
        let config = DebugConfig {
            log_level: "tui_globe=loud".to_string(),
            log_file: None,
        };
        if std::env::var("RUST_LOG").is_err() {
            assert_eq!(format!("{}", env_filter(&config)), DEFAULT_FILTER);
        }
    }

    // One test owns the global subscriber; a second install must be reported.
    #[test]
    fn test_log_file_is_created_and_reinstall_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("logs").join("globe.log");
        let config = DebugConfig {
            log_level: "info".to_string(),
            log_file: Some(path.clone()),
        };
        init_logging(&config).expect("log file");
        assert!(path.exists());

        let again = init_logging(&DebugConfig::default());
        assert!(matches!(again, Err(LoggingError::Install(_))));
    }

    #[test]
    fn test_unwritable_log_file_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        // a directory cannot be opened as the log file
        let config = DebugConfig {
            log_level: "info".to_string(),
            log_file: Some(dir.path().to_path_buf()),
        };
        assert!(matches!(init_logging(&config), Err(LoggingError::LogFile(_))));
    }
}
