//! Domain-specific configuration modules

pub mod attendance;
pub mod database;
pub mod logging;
pub mod server;

use serde::{Deserialize, Serialize};

use crate::error::ConfigResult;
use crate::validation::Validatable;

/// Complete studyroom configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyroomConfig {
    /// Server configuration
    pub server: server::ServerConfig,

    /// Database configuration
    pub database: database::DatabaseConfig,

    /// Logging configuration
    pub logging: logging::LoggingConfig,

    /// Attendance engine configuration
    pub attendance: attendance::AttendanceConfig,
}

impl StudyroomConfig {
    /// Validate every domain
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.server.validate()?;
        self.database.validate()?;
        self.logging.validate()?;
        self.attendance.validate()?;
        Ok(())
    }
}
