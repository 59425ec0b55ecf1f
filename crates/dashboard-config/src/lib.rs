//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, LoggingConfig, PollingSettings, ServiceSettings, SettingsError,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Prefix of environment overrides, e.g. `DASHBOARD__SERVICE__BASE_URL`.
pub const ENV_PREFIX: &str = "DASHBOARD";

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
