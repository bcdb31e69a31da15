use crate::error::ConfigError;
use crate::settings::Logging;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_FILE_NAME: &str = "commodities.log";

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. When a log directory is
/// configured, a plain-text copy of every event is written there as well;
/// the returned guard must be held until the program exits or buffered
/// lines are lost.
pub fn init_tracing(settings: &Logging) -> Result<Option<WorkerGuard>, ConfigError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| ConfigError::LoggingError(e.to_string()))?;

    let console = fmt::layer().with_target(false);

    match &settings.directory {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                ConfigError::LoggingError(format!("cannot create {}: {}", dir.display(), e))
            })?;
            let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init()
                .map_err(|e| ConfigError::LoggingError(e.to_string()))?;

            tracing::debug!("Logging to {}", dir.join(LOG_FILE_NAME).display());
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .try_init()
                .map_err(|e| ConfigError::LoggingError(e.to_string()))?;

            Ok(None)
        }
    }
}
