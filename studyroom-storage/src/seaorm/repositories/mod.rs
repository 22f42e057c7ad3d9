//! Repository implementations using SeaORM

pub mod repository_service;
pub mod session_repository;
pub mod user_repository;

pub use repository_service::SeaOrmRepositoryFactory;
pub use session_repository::SeaOrmSessionRepository;
pub use user_repository::SeaOrmUserRepository;
