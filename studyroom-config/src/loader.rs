//! Configuration loading and environment variable handling

use std::path::Path;

use crate::domains::StudyroomConfig;
use crate::error::{ConfigError, ConfigResult};

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with the default prefix
    pub fn new() -> Self {
        Self {
            prefix: "STUDYROOM".to_string(),
        }
    }

    /// Create a new config loader with a custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML or JSON file with environment
    /// overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<StudyroomConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let mut config: StudyroomConfig = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<StudyroomConfig> {
        let mut config = StudyroomConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<StudyroomConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut StudyroomConfig) -> ConfigResult<()> {
        if let Ok(bind) = self.get_env_var("BIND_ADDRESS") {
            config.server.bind_address = bind;
        }

        if let Ok(port) = self.get_env_var("PORT") {
            config.server.port = port
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid PORT: {}", e)))?;
        }

        if let Ok(url) = self.get_env_var("DATABASE_URL") {
            config.database.url = url;
        }

        if let Ok(level) = self.get_env_var("LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(offset) = self.get_env_var("UTC_OFFSET_HOURS") {
            config.attendance.utc_offset_hours = offset
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid UTC_OFFSET_HOURS: {}", e)))?;
        }

        if let Ok(days) = self.get_env_var("TREND_DAYS") {
            config.attendance.trend_days = days
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid TREND_DAYS: {}", e)))?;
        }

        Ok(())
    }

    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
