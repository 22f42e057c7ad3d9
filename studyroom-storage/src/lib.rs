//! Storage abstraction and repository pattern for the studyroom service
//!
//! SeaORM entities, migrations and repository implementations backing the
//! `studyroom-interfaces` traits, plus in-memory database helpers for tests.

pub mod seaorm;
pub mod testing;

// Re-export the main storage types
pub use seaorm::config::DatabaseConfig;
pub use seaorm::connection::DatabaseConnection;
pub use seaorm::migrations::Migrator;
pub use seaorm::repositories::{SeaOrmRepositoryFactory, SeaOrmSessionRepository, SeaOrmUserRepository};
