//! Server configuration for the REST API

use serde::{Deserialize, Serialize};

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable CORS middleware
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Enable request tracing
    #[serde(default = "default_true")]
    pub enable_tracing: bool,

    /// API path prefix
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            enable_cors: true,
            enable_tracing: true,
            api_prefix: default_api_prefix(),
        }
    }
}

impl Validatable for ServerConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.bind_address, "bind_address", self.domain_name())?;
        validate_positive(self.port, "port", self.domain_name())?;
        validate_required_string(&self.api_prefix, "api_prefix", self.domain_name())?;

        if !self.api_prefix.starts_with('/') {
            return Err(self.validation_error("api_prefix must start with '/'"));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "server"
    }
}

// Default value functions
fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

fn default_true() -> bool {
    true
}
