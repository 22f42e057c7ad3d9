use sea_orm_migration::prelude::*;

use super::m20240501_000002_create_sessions_table::Sessions;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Index on sessions.user_id for per-user queries
        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_user_id")
                    .table(Sessions::Table)
                    .col(Sessions::UserId)
                    .to_owned(),
            )
            .await?;

        // Index on sessions.checkin_at for window overlap scans
        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_checkin_at")
                    .table(Sessions::Table)
                    .col(Sessions::CheckinAt)
                    .to_owned(),
            )
            .await?;

        // Partial unique index: at most one open session per user. This is
        // the atomic guard behind the check-in conflict rule; a racing
        // second insert fails here even if both requests passed the
        // read-side check.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_sessions_open_user \
                 ON sessions (user_id) WHERE checkout_at IS NULL",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS idx_sessions_open_user")
            .await?;

        manager
            .drop_index(Index::drop().name("idx_sessions_checkin_at").table(Sessions::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_sessions_user_id").table(Sessions::Table).to_owned())
            .await?;

        Ok(())
    }
}
