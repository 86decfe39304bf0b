//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `uptimed.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use chrono_tz::Tz;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Schedule write settings.
    pub schedule: ScheduleConfig,
    /// Reconciliation pass settings.
    pub reconciler: ReconcilerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Demo fleet toggle.
    pub demo: DemoConfig,
}

/// Settings attached to every schedule write.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// IANA timezone name written alongside schedules (e.g. `US/Eastern`).
    pub timezone: String,
    /// Create an all-unset record when setting a schedule on an
    /// instance that has none.
    pub auto_create: bool,
}

/// Reconciliation loop configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Seconds between reconciliation passes.
    pub interval_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Demo fleet toggle.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Seed the in-memory store with a small demo fleet.
    pub enabled: bool,
}

impl Config {
    /// Load configuration from `uptimed.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if
    /// the resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("uptimed.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("UPTIMED_TIMEZONE") {
            self.schedule.timezone = val;
        }
        if let Some(flag) = env_parsed("UPTIMED_AUTO_CREATE") {
            self.schedule.auto_create = flag;
        }
        if let Some(secs) = env_parsed("UPTIMED_INTERVAL_SECS") {
            self.reconciler.interval_secs = secs;
        }
        if let Ok(val) = std::env::var("UPTIMED_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.timezone()?;
        if self.reconciler.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "reconciler interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured timezone, parsed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when the name is not a known
    /// IANA zone.
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.schedule.timezone.parse().map_err(|_| {
            ConfigError::Validation(format!(
                "unknown timezone: {:?}",
                self.schedule.timezone
            ))
        })
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            auto_create: false,
        }
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self { interval_secs: 300 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "uptimed=info,uptime=info".to_string(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// An environment variable's parsed value, `None` when absent or
/// unparseable.
fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|val| val.parse().ok())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
