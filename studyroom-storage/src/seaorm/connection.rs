//! Database connection management

use sea_orm::{ConnectOptions, Database, DatabaseConnection as SeaConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use super::config::DatabaseConfig;
use super::migrations::Migrator;

/// Database connection wrapper with configuration
#[derive(Clone)]
pub struct DatabaseConnection {
    connection: SeaConnection,
    config: DatabaseConfig,
}

/// Database-related errors
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    DbError(#[from] DbErr),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DatabaseConnection {
    /// Create a new database connection with configuration
    pub async fn new(config: DatabaseConfig) -> Result<Self, DatabaseError> {
        info!("Connecting to database: {}", config.url);

        // Handle SQLite file creation if needed
        Self::ensure_sqlite_file_exists(&config.url)?;

        let mut opts = ConnectOptions::new(&config.url);
        opts.max_connections(config.max_connections)
            .min_connections(1)
            .connect_timeout(config.connection_timeout)
            .acquire_timeout(config.connection_timeout)
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(3600))
            .sqlx_logging(true)
            .sqlx_logging_level(log::LevelFilter::Debug);

        let connection = Database::connect(opts).await?;

        debug!(
            "Database connection established with {} max connections",
            config.max_connections
        );

        Ok(Self { connection, config })
    }

    /// Create a connection and bring the schema up to date
    pub async fn connect_and_migrate(config: DatabaseConfig) -> Result<Self, DatabaseError> {
        let db = Self::new(config).await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Run all pending migrations
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        info!("Running database migrations");
        Migrator::up(&self.connection, None)
            .await
            .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
        Ok(())
    }

    /// Access the underlying SeaORM connection
    pub fn get_connection(&self) -> &SeaConnection {
        &self.connection
    }

    /// The configuration this connection was created with
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Ensure the parent directory exists for file-based SQLite databases
    fn ensure_sqlite_file_exists(database_url: &str) -> Result<(), DatabaseError> {
        if !database_url.starts_with("sqlite:") || database_url.contains(":memory:") {
            return Ok(());
        }

        let file_path = database_url
            .strip_prefix("sqlite://")
            .or_else(|| database_url.strip_prefix("sqlite:"))
            .ok_or_else(|| DatabaseError::ConfigError(format!("Invalid SQLite URL format: {}", database_url)))?;

        let path = std::path::Path::new(file_path);
        if let Some(parent_dir) = path.parent() {
            if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                info!("Creating database directory: {:?}", parent_dir);
                std::fs::create_dir_all(parent_dir).map_err(|e| {
                    DatabaseError::ConfigError(format!(
                        "Failed to create database directory {:?}: {}",
                        parent_dir, e
                    ))
                })?;
            }
        }

        // SQLite creates the file itself; only the directory must exist
        if !path.exists() {
            debug!("Database file will be created by SQLite: {:?}", path);
        }

        Ok(())
    }
}
