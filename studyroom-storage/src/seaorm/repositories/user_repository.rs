//! User repository implementation using SeaORM

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};

use studyroom_api_types::{ApiId, UnifiedUser};
use studyroom_interfaces::{DatabaseError, Repository, UserRepository};

use crate::seaorm::{
    connection::DatabaseConnection,
    entities::{users, Users},
};

/// SeaORM implementation of the UserRepository
#[derive(Clone)]
pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Convert SeaORM user model to unified domain type
    fn to_unified_user(model: users::Model) -> UnifiedUser {
        UnifiedUser {
            id: ApiId::from_i32(model.id),
            student_no: model.student_no,
            name: model.name,
            nickname: model.nickname,
            created_at: model.created_at,
        }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create_user(
        &self,
        student_no: &str,
        name: &str,
        nickname: &str,
        pin_hash: &str,
    ) -> Result<UnifiedUser, DatabaseError> {
        let active_model = users::ActiveModel {
            student_no: Set(student_no.to_string()),
            name: Set(name.to_string()),
            nickname: Set(nickname.to_string()),
            pin_hash: Set(pin_hash.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let result = active_model.insert(self.db.get_connection()).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                DatabaseError::Constraint {
                    message: format!("student number already registered: {}", student_no),
                }
            } else {
                DatabaseError::Internal {
                    message: format!("Failed to create user: {}", e),
                }
            }
        })?;

        Ok(Self::to_unified_user(result))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<UnifiedUser>, DatabaseError> {
        let user = Users::find_by_id(id)
            .one(self.db.get_connection())
            .await
            .map_err(|e| DatabaseError::Internal {
                message: format!("Failed to find user by id: {}", e),
            })?;

        Ok(user.map(Self::to_unified_user))
    }

    async fn find_by_student_no(&self, student_no: &str) -> Result<Option<UnifiedUser>, DatabaseError> {
        let user = Users::find()
            .filter(users::Column::StudentNo.eq(student_no))
            .one(self.db.get_connection())
            .await
            .map_err(|e| DatabaseError::Internal {
                message: format!("Failed to find user by student number: {}", e),
            })?;

        Ok(user.map(Self::to_unified_user))
    }

    async fn pin_hash_by_student_no(&self, student_no: &str) -> Result<Option<String>, DatabaseError> {
        let user = Users::find()
            .filter(users::Column::StudentNo.eq(student_no))
            .one(self.db.get_connection())
            .await
            .map_err(|e| DatabaseError::Internal {
                message: format!("Failed to load credential hash: {}", e),
            })?;

        Ok(user.map(|u| u.pin_hash))
    }

    async fn list_users(&self, limit: u64) -> Result<Vec<UnifiedUser>, DatabaseError> {
        let users = Users::find()
            .order_by_desc(users::Column::CreatedAt)
            .limit(limit)
            .all(self.db.get_connection())
            .await
            .map_err(|e| DatabaseError::Internal {
                message: format!("Failed to list users: {}", e),
            })?;

        Ok(users.into_iter().map(Self::to_unified_user).collect())
    }

    async fn update_pin_hash(&self, student_no: &str, pin_hash: &str) -> Result<(), DatabaseError> {
        let user = Users::find()
            .filter(users::Column::StudentNo.eq(student_no))
            .one(self.db.get_connection())
            .await
            .map_err(|e| DatabaseError::Internal {
                message: format!("Failed to find user for PIN update: {}", e),
            })?
            .ok_or_else(|| DatabaseError::NotFound {
                entity: "User".to_string(),
                id: student_no.to_string(),
            })?;

        let active_model = users::ActiveModel {
            id: Set(user.id),
            pin_hash: Set(pin_hash.to_string()),
            ..Default::default()
        };

        active_model
            .update(self.db.get_connection())
            .await
            .map_err(|e| DatabaseError::Internal {
                message: format!("Failed to update PIN hash: {}", e),
            })?;

        Ok(())
    }

    async fn count(&self) -> Result<u64, DatabaseError> {
        Users::find()
            .count(self.db.get_connection())
            .await
            .map_err(|e| DatabaseError::Internal {
                message: format!("Failed to count users: {}", e),
            })
    }
}

#[async_trait]
impl Repository for SeaOrmUserRepository {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Users::find()
            .limit(1)
            .all(self.db.get_connection())
            .await
            .map_err(|e| DatabaseError::Connection {
                message: format!("User repository health check failed: {}", e),
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::database::create_test_database;

    async fn repository() -> SeaOrmUserRepository {
        SeaOrmUserRepository::new(create_test_database().await)
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let repo = repository().await;
        let created = repo.create_user("s2024-001", "Taro", "taro", "$2b$hash").await.unwrap();
        assert_eq!(created.student_no, "s2024-001");

        let by_id = repo.find_by_id(created.id.as_i32().unwrap()).await.unwrap().unwrap();
        assert_eq!(by_id.nickname, "taro");

        let by_no = repo.find_by_student_no("s2024-001").await.unwrap().unwrap();
        assert_eq!(by_no.id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_student_no_is_constraint_violation() {
        let repo = repository().await;
        repo.create_user("s2024-001", "Taro", "taro", "h1").await.unwrap();
        let err = repo.create_user("s2024-001", "Jiro", "jiro", "h2").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Constraint { .. }));
    }

    #[tokio::test]
    async fn test_pin_hash_round_trip() {
        let repo = repository().await;
        repo.create_user("s2024-001", "Taro", "taro", "old-hash").await.unwrap();

        assert_eq!(
            repo.pin_hash_by_student_no("s2024-001").await.unwrap().as_deref(),
            Some("old-hash")
        );

        repo.update_pin_hash("s2024-001", "new-hash").await.unwrap();
        assert_eq!(
            repo.pin_hash_by_student_no("s2024-001").await.unwrap().as_deref(),
            Some("new-hash")
        );
    }

    #[tokio::test]
    async fn test_update_pin_hash_unknown_user() {
        let repo = repository().await;
        let err = repo.update_pin_hash("nope", "h").await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_count_and_list() {
        let repo = repository().await;
        repo.create_user("s1", "A", "a", "h").await.unwrap();
        repo.create_user("s2", "B", "b", "h").await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);
        assert_eq!(repo.list_users(10).await.unwrap().len(), 2);
        assert_eq!(repo.list_users(1).await.unwrap().len(), 1);
    }
}
