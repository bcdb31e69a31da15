use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    AnalysisParams, Cleaning, Config, DateRange, Logging, MetricsParams, Paths, PeriodName, Periods,
};

/// The file read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix for environment overrides, e.g. `COMMODITIES__PATHS__DATA_DIR`.
pub const ENV_PREFIX: &str = "COMMODITIES";

/// Loads the application configuration from `config.toml` in the working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// Loads the application configuration.
///
/// Sources are layered lowest to highest: built-in defaults, the TOML file at
/// `path` (optional; a missing file is not an error), then environment
/// variables. A `.env` file in the working directory is loaded first so its
/// entries behave like real environment variables.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();

    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    Ok(config)
}

/// Rejects settings the pipeline cannot run with.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    for (name, range) in config.periods.iter() {
        if range.start > range.end {
            return Err(ConfigError::ValidationError(format!(
                "period '{}' starts ({}) after it ends ({})",
                name, range.start, range.end
            )));
        }
    }
    if config.metrics.annualizing_period == 0 {
        return Err(ConfigError::ValidationError(
            "metrics.annualizing_period must be positive".to_string(),
        ));
    }
    if config.metrics.first_rank == 0 {
        return Err(ConfigError::ValidationError(
            "metrics.first_rank must be at least 1".to_string(),
        ));
    }
    if config.metrics.returns_contract == 0 {
        return Err(ConfigError::ValidationError(
            "metrics.returns_contract must be at least 1".to_string(),
        ));
    }
    if config.analysis.rolling_window < 2 {
        return Err(ConfigError::ValidationError(
            "analysis.rolling_window must be at least 2".to_string(),
        ));
    }
    if config.paths.input_file.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "paths.input_file must not be empty".to_string(),
        ));
    }
    Ok(())
}
