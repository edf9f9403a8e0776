//! Galerie membership entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of a user inside one galerie.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "camelCase")]
pub enum GalerieRole {
    /// Regular member.
    #[default]
    #[sea_orm(string_value = "user")]
    User,
    /// Can remove regular members.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Owner - exactly one per live galerie.
    #[sea_orm(string_value = "creator")]
    Creator,
}

impl GalerieRole {
    /// Check if the role can remove members of the given role.
    #[must_use]
    pub const fn can_remove(self, target: Self) -> bool {
        match (self, target) {
            (Self::Creator, Self::Admin | Self::User) => true,
            (Self::Admin, Self::User) => true,
            _ => false,
        }
    }

    /// Check if this is the creator role.
    #[must_use]
    pub const fn is_creator(self) -> bool {
        matches!(self, Self::Creator)
    }
}

/// Membership of a user in a galerie.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "galerie_user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub galerie_id: String,

    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,

    pub role: GalerieRole,

    /// Whether frames were posted since the member last looked.
    #[sea_orm(default_value = false)]
    pub has_new_frames: bool,

    pub created_at: DateTimeWithTimeZone,
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
