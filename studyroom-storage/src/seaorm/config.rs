//! Storage-layer database configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection settings for the storage layer.
///
/// Deliberately minimal: the application-level configuration crate maps its
/// database domain onto this at wiring time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: String,

    /// Maximum number of pooled connections
    pub max_connections: u32,

    /// Connection acquire timeout
    pub connection_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://studyroom.db".to_string(),
            max_connections: 5,
            connection_timeout: Duration::from_secs(30),
        }
    }
}

impl DatabaseConfig {
    /// Configuration for a migrated in-memory database.
    ///
    /// A single connection is required: every pooled connection to
    /// `sqlite::memory:` would otherwise see its own empty database.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connection_timeout: Duration::from_secs(5),
        }
    }
}
