//! Frame entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A post inside a galerie, grouping one or more pictures.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "frame")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub galerie_id: String,

    /// Author.
    #[sea_orm(indexed)]
    pub user_id: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Denormalized like count. Always equals the number of like rows.
    #[sea_orm(default_value = 0)]
    pub num_of_likes: i32,

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
    #[sea_orm(has_many = "super::galerie_picture::Entity")]
    GaleriePicture,
    #[sea_orm(has_many = "super::like::Entity")]
    Like,
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

impl Related<super::galerie_picture::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GaleriePicture.def()
    }
}

impl Related<super::like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Like.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
