//! Attendance session entity
//!
//! One row per contiguous span of presence. An open session has a null
//! `checkout_at`; a partial unique index keeps at most one open row per
//! user.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// User this session belongs to
    pub user_id: i32,
    /// When the user checked in
    pub checkin_at: DateTimeUtc,
    /// When the user checked out; null while the session is open
    pub checkout_at: Option<DateTimeUtc>,
    /// Whole seconds between check-in and check-out, set at checkout
    pub duration_sec: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
