//! Profile picture entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An avatar uploaded by a user. Owns three image rows.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profile_picture")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub user_id: String,

    pub original_image_id: String,

    pub cropped_image_id: String,

    pub pending_image_id: String,

    /// Whether this is the avatar currently shown.
    #[sea_orm(default_value = false)]
    pub current: bool,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Ids of the image rows owned by this picture.
    #[must_use]
    pub fn image_ids(&self) -> [&str; 3] {
        [
            &self.original_image_id,
            &self.cropped_image_id,
            &self.pending_image_id,
        ]
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
        belongs_to = "super::image::Entity",
        from = "Column::OriginalImageId",
        to = "super::image::Column::Id"
    )]
    OriginalImage,
    #[sea_orm(
        belongs_to = "super::image::Entity",
        from = "Column::CroppedImageId",
        to = "super::image::Column::Id"
    )]
    CroppedImage,
    #[sea_orm(
        belongs_to = "super::image::Entity",
        from = "Column::PendingImageId",
        to = "super::image::Column::Id"
    )]
    PendingImage,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
