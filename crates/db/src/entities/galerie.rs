//! Galerie entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "galerie")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Set when the creator left while other members remained.
    /// An archived galerie has no creator and is read-only.
    #[sea_orm(default_value = false)]
    pub archived: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::galerie_user::Entity")]
    GalerieUser,
    #[sea_orm(has_many = "super::frame::Entity")]
    Frame,
    #[sea_orm(has_many = "super::invitation::Entity")]
    Invitation,
}

impl Related<super::galerie_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GalerieUser.def()
    }
}

impl Related<super::frame::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Frame.def()
    }
}

impl Related<super::invitation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invitation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
