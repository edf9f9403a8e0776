//! Invitation entity.

use chrono::{DateTime, Duration, FixedOffset};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Invitation code to join a galerie.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invitation")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub galerie_id: String,

    /// Member who created the invitation.
    #[sea_orm(indexed)]
    pub user_id: String,

    #[sea_orm(unique)]
    pub code: String,

    /// Validity in milliseconds from creation. NULL never expires.
    #[sea_orm(nullable)]
    pub time: Option<i64>,

    /// Remaining uses. NULL is unlimited.
    #[sea_orm(nullable)]
    pub num_of_invits: Option<i32>,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Whether the invitation can no longer be used at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<FixedOffset>) -> bool {
        let out_of_time = self
            .time
            .is_some_and(|ms| self.created_at + Duration::milliseconds(ms) <= now);
        let used_up = self.num_of_invits.is_some_and(|n| n <= 0);
        out_of_time || used_up
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::galerie::Entity",
        from = "Column::GalerieId",
        to = "super::galerie::Column::Id"
    )]
    Galerie,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::galerie::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Galerie.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
