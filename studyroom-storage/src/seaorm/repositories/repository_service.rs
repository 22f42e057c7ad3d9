//! Repository factory wiring all SeaORM repositories together

use async_trait::async_trait;

use studyroom_interfaces::{DatabaseError, Repository, RepositoryFactory, SessionRepository, UserRepository};

use crate::seaorm::connection::DatabaseConnection;
use crate::seaorm::repositories::{SeaOrmSessionRepository, SeaOrmUserRepository};

/// SeaORM implementation of the repository factory
#[derive(Clone)]
pub struct SeaOrmRepositoryFactory {
    user_repository: SeaOrmUserRepository,
    session_repository: SeaOrmSessionRepository,
}

impl SeaOrmRepositoryFactory {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repository: SeaOrmUserRepository::new(db.clone()),
            session_repository: SeaOrmSessionRepository::new(db),
        }
    }
}

#[async_trait]
impl RepositoryFactory for SeaOrmRepositoryFactory {
    fn user_repository(&self) -> &dyn UserRepository {
        &self.user_repository
    }

    fn session_repository(&self) -> &dyn SessionRepository {
        &self.session_repository
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.user_repository.health_check().await?;
        self.session_repository.health_check().await?;
        Ok(())
    }
}
