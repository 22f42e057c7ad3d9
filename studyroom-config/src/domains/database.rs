//! Database configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL
    #[serde(default = "default_url")]
    pub url: String,

    /// Maximum number of pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_connection_timeout_secs")]
    pub connection_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Connection acquire timeout as a [`Duration`]
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            max_connections: default_max_connections(),
            connection_timeout_secs: default_connection_timeout_secs(),
        }
    }
}

impl Validatable for DatabaseConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.url, "url", self.domain_name())?;
        validate_positive(self.max_connections, "max_connections", self.domain_name())?;
        validate_positive(self.connection_timeout_secs, "connection_timeout_secs", self.domain_name())?;

        if !self.url.starts_with("sqlite:") {
            return Err(self.validation_error(format!("unsupported database url scheme: {}", self.url)));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "database"
    }
}

// Default value functions
fn default_url() -> String {
    "sqlite://studyroom.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_connection_timeout_secs() -> u64 {
    30
}
