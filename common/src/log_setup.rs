use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LogSetupError {
    #[error("Invalid log filter '{filter}': {source}")]
    Filter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("Failed to create log directory {}: {source}", dir.display())]
    Directory {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to create log file appender: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),
    #[error("Logging already initialized")]
    AlreadyInitialized,
}

/// Where and how much to log. `RUST_LOG` overrides `base_level`.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub base_level: String,
    pub dir: PathBuf,
    pub file_prefix: String,
    pub max_files: usize,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            base_level: "info".to_string(),
            dir: PathBuf::from("logs"),
            file_prefix: "featuremaps".to_string(),
            max_files: 5,
        }
    }
}

/// Installs the global subscriber with default settings at `base_level`.
pub fn setup_logging(base_level: &str) -> Result<(), LogSetupError> {
    setup_logging_with(&LogSettings {
        base_level: base_level.to_string(),
        ..Default::default()
    })
}

/// Installs the global subscriber: console (warnings and errors also to
/// stderr) plus a daily rotated file in `settings.dir`.
pub fn setup_logging_with(settings: &LogSettings) -> Result<(), LogSetupError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.base_level).map_err(|source| {
            LogSetupError::Filter {
                filter: settings.base_level.clone(),
                source,
            }
        })?,
    };

    std::fs::create_dir_all(&settings.dir).map_err(|source| LogSetupError::Directory {
        dir: settings.dir.clone(),
        source,
    })?;

    let file_appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .filename_prefix(&settings.file_prefix)
        .filename_suffix("log")
        .max_log_files(settings.max_files)
        .build(&settings.dir)?;

    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    LOG_GUARD
        .set(guard)
        .map_err(|_| LogSetupError::AlreadyInitialized)?;

    let console_writer = std::io::stdout.and(std::io::stderr.with_min_level(Level::WARN));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(console_writer);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false)
        .with_writer(file_writer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|_| LogSetupError::AlreadyInitialized)
}

/// Console-only subscriber writing through the test harness capture.
/// Safe to call from every test; only the first call installs it.
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = LogSettings::default();
        assert_eq!(settings.base_level, "info");
        assert_eq!(settings.dir, PathBuf::from("logs"));
        assert_eq!(settings.file_prefix, "featuremaps");
    }

    #[test]
    fn test_unusable_directory_is_reported() {
        let blocker =
            std::env::temp_dir().join(format!("log_setup_blocker_{}", std::process::id()));
        std::fs::write(&blocker, b"not a directory").unwrap();

        let settings = LogSettings {
            dir: blocker.join("logs"),
            ..Default::default()
        };
        let result = setup_logging_with(&settings);
        std::fs::remove_file(&blocker).unwrap();

        match result {
            Err(LogSetupError::Directory { dir, .. }) => assert_eq!(dir, settings.dir),
            other => panic!("expected Directory error, got {other:?}"),
        }
    }
}
