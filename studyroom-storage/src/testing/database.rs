//! In-memory database helpers for tests

use crate::seaorm::config::DatabaseConfig;
use crate::seaorm::connection::DatabaseConnection;

/// Create a fresh, fully migrated in-memory database.
///
/// Panics on failure: this is a test fixture, not production code.
pub async fn create_test_database() -> DatabaseConnection {
    DatabaseConnection::connect_and_migrate(DatabaseConfig::in_memory())
        .await
        .expect("in-memory test database")
}
