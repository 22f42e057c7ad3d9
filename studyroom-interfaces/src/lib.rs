//! # Studyroom Interfaces
//!
//! Repository traits shared across the studyroom workspace.
//!
//! The aggregation engine depends only on these traits, so the storage
//! backend can be swapped (or mocked in tests) without touching the engine.

pub mod database;

// Re-export commonly used types
pub use database::{DatabaseError, Repository, RepositoryFactory, SessionRepository, UserRepository};
