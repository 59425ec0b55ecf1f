//! Configuration structures.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// A setting that would leave the dashboard unable to run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("service.base_url must not be empty")]
    EmptyBaseUrl,
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub polling: PollingSettings,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.service.base_url.trim().is_empty() {
            return Err(SettingsError::EmptyBaseUrl);
        }

        let positive = [
            ("service.request_timeout_secs", self.service.request_timeout_secs),
            ("polling.cash_interval_secs", self.polling.cash_interval_secs),
            ("polling.profit_interval_secs", self.polling.profit_interval_secs),
            ("polling.trades_interval_secs", self.polling.trades_interval_secs),
        ];
        match positive.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(SettingsError::Zero(*name)),
            None => Ok(()),
        }
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "crypto-dashboard".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Remote trading service connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl ServiceSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Refresh period of each feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingSettings {
    pub cash_interval_secs: u64,
    pub profit_interval_secs: u64,
    pub trades_interval_secs: u64,
}

impl PollingSettings {
    pub fn cash_interval(&self) -> Duration {
        Duration::from_secs(self.cash_interval_secs)
    }

    pub fn profit_interval(&self) -> Duration {
        Duration::from_secs(self.profit_interval_secs)
    }

    pub fn trades_interval(&self) -> Duration {
        Duration::from_secs(self.trades_interval_secs)
    }
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            cash_interval_secs: 600,
            profit_interval_secs: 10,
            trades_interval_secs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.polling.cash_interval(), Duration::from_secs(600));
        assert_eq!(config.polling.profit_interval(), Duration::from_secs(10));
    }

    #[test]
    fn test_validate_rejects_zero_and_empty() {
        let mut config = AppConfig::default();
        config.polling.trades_interval_secs = 0;
        assert_eq!(
            config.validate(),
            Err(SettingsError::Zero("polling.trades_interval_secs"))
        );

        let mut config = AppConfig::default();
        config.service.base_url = "  ".to_string();
        assert_eq!(config.validate(), Err(SettingsError::EmptyBaseUrl));
    }

    #[test]
    fn test_round_trips_through_toml() {
        let text = toml::to_string(&AppConfig::default()).unwrap();
        assert!(text.contains("[polling]"));

        let parsed: AppConfig = toml::from_str("[polling]\ntrades_interval_secs = 5\n").unwrap();
        assert_eq!(parsed.polling.trades_interval(), Duration::from_secs(5));
        assert_eq!(parsed.polling.cash_interval_secs, 600);
        assert_eq!(parsed.service.base_url, "http://127.0.0.1:5000");
    }
}
