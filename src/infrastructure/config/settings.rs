//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file with environment variable overrides
//! for deployment-specific values such as the database path.
//!
//! # Example
//!
//! ```no_run
//! use roasbot::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::logging::LoggingConfig;
use super::poller::PollerConfig;
use super::signal::{SignalConfig, StatisticsConfig};
use super::telegram::TelegramConfig;
use crate::error::{ConfigError, Result};

/// Database path that selects the in-process store.
pub const MEMORY_DATABASE: &str = ":memory:";

/// Main application configuration.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Matching, confidence, and message settings.
    #[serde(default)]
    pub signal: SignalConfig,

    /// Per-game-type history retention.
    #[serde(default)]
    pub statistics: StatisticsConfig,

    /// Background pollers.
    #[serde(default)]
    pub poller: PollerConfig,

    /// Telegram delivery.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Path to SQLite database file.
    ///
    /// Defaults to "roasbot.db" in the current directory.
    #[serde(default = "default_database_path")]
    pub database: String,
}

fn default_database_path() -> String {
    "roasbot.db".to_string()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Applies `ROASBOT_DATABASE` and `TELEGRAM_ENABLED` from the environment
    /// before validating.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed, an override cannot
    /// be interpreted, or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load from `path` when it exists, otherwise start from defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file is invalid.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::parse_toml("")
        }
    }

    /// Initialize the global tracing subscriber from the logging section.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// True when the configured database selects the in-process store.
    #[must_use]
    pub fn uses_memory_store(&self) -> bool {
        self.database == MEMORY_DATABASE
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("ROASBOT_DATABASE") {
            if !path.trim().is_empty() {
                self.database = path;
            }
        }
        if let Ok(raw) = std::env::var("TELEGRAM_ENABLED") {
            self.telegram.enabled = parse_flag(&raw).ok_or_else(|| ConfigError::InvalidValue {
                field: "TELEGRAM_ENABLED",
                reason: format!("expected true or false, got {raw:?}"),
            })?;
        }
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are present and values are within
    /// acceptable ranges.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        if self.signal.ring_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ring_capacity",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if !(self.signal.low_threshold.is_finite() && self.signal.low_threshold > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "low_threshold",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.signal.target_multiplier.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "target_multiplier",
            }
            .into());
        }
        if self.statistics.recent_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "recent_limit",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if self.statistics.history_capacity < self.statistics.recent_limit {
            return Err(ConfigError::InvalidValue {
                field: "history_capacity",
                reason: "must be >= recent_limit".to_string(),
            }
            .into());
        }
        if self.poller.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "interval_secs",
                reason: "must be at least 1 second".to_string(),
            }
            .into());
        }
        if self.telegram.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::infrastructure::config::signal::ConfidenceKind;

    fn parse_without_env(content: &str) -> Result<Config> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn invalid_field(result: Result<Config>) -> &'static str {
        match result {
            Err(Error::Config(ConfigError::InvalidValue { field, .. })) => field,
            other => panic!("expected invalid value, got {other:?}"),
        }
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_without_env("").unwrap();
        assert_eq!(config.database, "roasbot.db");
        assert_eq!(config.signal.ring_capacity, 20);
        assert!((config.signal.low_threshold - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.signal.target_multiplier, "2.5x");
        assert_eq!(config.signal.confidence, ConfidenceKind::Tail);
        assert_eq!(config.statistics.history_capacity, 100);
        assert_eq!(config.statistics.recent_limit, 10);
        assert!(!config.poller.enabled);
        assert_eq!(config.poller.interval_secs, 30);
        assert_eq!(config.telegram.timeout_secs, 10);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn sections_override_defaults() {
        let config = parse_without_env(
            r#"
            database = ":memory:"

            [logging]
            level = "debug"
            format = "json"

            [signal]
            ring_capacity = 8
            low_threshold = 1.5
            confidence = "seeded"
            seed = 42

            [poller]
            enabled = true
            interval_secs = 5
            simulate = true

            [telegram]
            enabled = false
            "#,
        )
        .unwrap();

        assert!(config.uses_memory_store());
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.signal.ring_capacity, 8);
        assert_eq!(config.signal.confidence, ConfidenceKind::Seeded);
        assert_eq!(config.signal.seed, Some(42));
        assert!(config.poller.enabled && config.poller.simulate);
        assert!(!config.telegram.enabled);
    }

    #[test]
    fn zero_ring_capacity_is_rejected() {
        let result = parse_without_env("[signal]\nring_capacity = 0\n");
        assert_eq!(invalid_field(result), "ring_capacity");
    }

    #[test]
    fn non_positive_threshold_is_rejected() {
        let result = parse_without_env("[signal]\nlow_threshold = 0.0\n");
        assert_eq!(invalid_field(result), "low_threshold");
    }

    #[test]
    fn history_must_cover_recent_limit() {
        let result =
            parse_without_env("[statistics]\nhistory_capacity = 5\nrecent_limit = 10\n");
        assert_eq!(invalid_field(result), "history_capacity");
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let result = parse_without_env("[poller]\ninterval_secs = 0\n");
        assert_eq!(invalid_field(result), "interval_secs");
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let result = parse_without_env("[signal\n");
        assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
    }

    #[test]
    fn unknown_confidence_kind_fails_to_parse() {
        let result = parse_without_env("[signal]\nconfidence = \"oracle\"\n");
        assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
