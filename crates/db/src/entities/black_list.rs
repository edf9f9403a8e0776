//! Black list entity.

use chrono::{DateTime, Duration, FixedOffset};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A ban placed on a user by a moderator.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "black_list")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Banned user.
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Moderator who placed the ban. NULL once that account is gone.
    #[sea_orm(indexed, nullable)]
    pub admin_id: Option<String>,

    /// Moderator who last edited the ban. NULL once that account is gone.
    #[sea_orm(indexed, nullable)]
    pub updated_by_id: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub reason: String,

    /// Duration in milliseconds. NULL is permanent.
    #[sea_orm(nullable)]
    pub time: Option<i64>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Whether the ban is over at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<FixedOffset>) -> bool {
        self.time
            .is_some_and(|ms| self.created_at + Duration::milliseconds(ms) <= now)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AdminId",
        to = "super::user::Column::Id"
    )]
    Admin,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UpdatedById",
        to = "super::user::Column::Id"
    )]
    UpdatedBy,
}

impl ActiveModelBehavior for ActiveModel {}
