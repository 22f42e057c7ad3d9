//! Attendance session repository implementation using SeaORM

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbErr, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr, TransactionError, TransactionTrait,
};

use studyroom_api_types::{ApiId, SessionSpan, UnifiedSession};
use studyroom_interfaces::{DatabaseError, Repository, SessionRepository};

use crate::seaorm::{
    connection::DatabaseConnection,
    entities::{sessions, Sessions},
};

/// Transaction-internal marker for a check-in that found an open session
const OPEN_SESSION_GUARD: &str = "open_session_exists";

/// SeaORM implementation of the SessionRepository
#[derive(Clone)]
pub struct SeaOrmSessionRepository {
    pub db: DatabaseConnection,
}

#[derive(FromQueryResult)]
struct DurationSum {
    total: Option<i64>,
}

impl SeaOrmSessionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Convert SeaORM session model to unified domain type
    fn to_unified_session(model: sessions::Model) -> UnifiedSession {
        UnifiedSession {
            id: ApiId::from_i32(model.id),
            user_id: ApiId::from_i32(model.user_id),
            checkin_at: model.checkin_at,
            is_active: model.checkout_at.is_none(),
            checkout_at: model.checkout_at,
            duration_sec: model.duration_sec,
        }
    }
}

#[async_trait]
impl SessionRepository for SeaOrmSessionRepository {
    async fn insert_checkin(&self, user_id: i32, checkin_at: DateTime<Utc>) -> Result<UnifiedSession, DatabaseError> {
        // Read-then-insert inside one transaction; the partial unique index
        // on open sessions catches whatever still races past the read.
        let result = self
            .db
            .get_connection()
            .transaction::<_, sessions::Model, DbErr>(|txn| {
                Box::pin(async move {
                    let open = Sessions::find()
                        .filter(sessions::Column::UserId.eq(user_id))
                        .filter(sessions::Column::CheckoutAt.is_null())
                        .one(txn)
                        .await?;

                    if open.is_some() {
                        return Err(DbErr::Custom(OPEN_SESSION_GUARD.to_string()));
                    }

                    let model = sessions::ActiveModel {
                        user_id: Set(user_id),
                        checkin_at: Set(checkin_at),
                        ..Default::default()
                    };
                    model.insert(txn).await
                })
            })
            .await;

        match result {
            Ok(model) => Ok(Self::to_unified_session(model)),
            Err(TransactionError::Transaction(e)) => {
                let open_guard = matches!(&e, DbErr::Custom(msg) if msg == OPEN_SESSION_GUARD);
                if open_guard || matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    Err(DatabaseError::Constraint {
                        message: format!("user {} already has an open session", user_id),
                    })
                } else {
                    Err(DatabaseError::Internal {
                        message: format!("Failed to insert check-in: {}", e),
                    })
                }
            }
            Err(TransactionError::Connection(e)) => Err(DatabaseError::Transaction {
                message: format!("Check-in transaction failed: {}", e),
            }),
        }
    }

    async fn find_open_for_user(&self, user_id: i32) -> Result<Option<UnifiedSession>, DatabaseError> {
        let session = Sessions::find()
            .filter(sessions::Column::UserId.eq(user_id))
            .filter(sessions::Column::CheckoutAt.is_null())
            .order_by_desc(sessions::Column::CheckinAt)
            .one(self.db.get_connection())
            .await
            .map_err(|e| DatabaseError::Internal {
                message: format!("Failed to find open session: {}", e),
            })?;

        Ok(session.map(Self::to_unified_session))
    }

    async fn close_session(
        &self,
        session_id: i32,
        checkout_at: DateTime<Utc>,
        duration_sec: i64,
    ) -> Result<UnifiedSession, DatabaseError> {
        let existing = Sessions::find_by_id(session_id)
            .one(self.db.get_connection())
            .await
            .map_err(|e| DatabaseError::Internal {
                message: format!("Failed to find session for checkout: {}", e),
            })?
            .ok_or_else(|| DatabaseError::NotFound {
                entity: "Session".to_string(),
                id: session_id.to_string(),
            })?;

        if existing.checkout_at.is_some() {
            return Err(DatabaseError::Constraint {
                message: format!("session {} is already closed", session_id),
            });
        }

        let active_model = sessions::ActiveModel {
            id: Set(existing.id),
            checkout_at: Set(Some(checkout_at)),
            duration_sec: Set(Some(duration_sec)),
            ..Default::default()
        };

        let updated = active_model
            .update(self.db.get_connection())
            .await
            .map_err(|e| DatabaseError::Internal {
                message: format!("Failed to close session: {}", e),
            })?;

        Ok(Self::to_unified_session(updated))
    }

    async fn find_overlapping(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        user_id: Option<i32>,
    ) -> Result<Vec<SessionSpan>, DatabaseError> {
        // Overlap predicate for [start, end): sessions that started before
        // the window ends and have not finished before it begins. Open
        // sessions (null checkout) always satisfy the second half.
        let mut query = Sessions::find()
            .filter(sessions::Column::CheckinAt.lt(end))
            .filter(
                Condition::any()
                    .add(sessions::Column::CheckoutAt.is_null())
                    .add(sessions::Column::CheckoutAt.gt(start)),
            );

        if let Some(uid) = user_id {
            query = query.filter(sessions::Column::UserId.eq(uid));
        }

        let rows = query
            .order_by_asc(sessions::Column::CheckinAt)
            .find_also_related(crate::seaorm::entities::Users)
            .all(self.db.get_connection())
            .await
            .map_err(|e| DatabaseError::Internal {
                message: format!("Failed to fetch overlapping sessions: {}", e),
            })?;

        Ok(rows
            .into_iter()
            .map(|(session, user)| SessionSpan {
                user_id: session.user_id,
                nickname: user.map(|u| u.nickname).unwrap_or_default(),
                checkin_at: session.checkin_at,
                checkout_at: session.checkout_at,
            })
            .collect())
    }

    async fn sum_closed_durations(&self, user_id: i32) -> Result<i64, DatabaseError> {
        let sum = Sessions::find()
            .select_only()
            .column_as(sessions::Column::DurationSec.sum(), "total")
            .filter(sessions::Column::UserId.eq(user_id))
            .filter(sessions::Column::CheckoutAt.is_not_null())
            .into_model::<DurationSum>()
            .one(self.db.get_connection())
            .await
            .map_err(|e| DatabaseError::Internal {
                message: format!("Failed to sum closed durations: {}", e),
            })?;

        Ok(sum.and_then(|s| s.total).unwrap_or(0))
    }

    async fn recent_for_user(&self, user_id: i32, limit: u64) -> Result<Vec<UnifiedSession>, DatabaseError> {
        let sessions = Sessions::find()
            .filter(sessions::Column::UserId.eq(user_id))
            .order_by_desc(sessions::Column::CheckinAt)
            .limit(limit)
            .all(self.db.get_connection())
            .await
            .map_err(|e| DatabaseError::Internal {
                message: format!("Failed to fetch recent sessions: {}", e),
            })?;

        Ok(sessions.into_iter().map(Self::to_unified_session).collect())
    }

    async fn count_open(&self) -> Result<u64, DatabaseError> {
        Sessions::find()
            .filter(sessions::Column::CheckoutAt.is_null())
            .count(self.db.get_connection())
            .await
            .map_err(|e| DatabaseError::Internal {
                message: format!("Failed to count open sessions: {}", e),
            })
    }
}

#[async_trait]
impl Repository for SeaOrmSessionRepository {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Sessions::find()
            .limit(1)
            .all(self.db.get_connection())
            .await
            .map_err(|e| DatabaseError::Connection {
                message: format!("Session repository health check failed: {}", e),
            })?;

        Ok(())
    }
}
