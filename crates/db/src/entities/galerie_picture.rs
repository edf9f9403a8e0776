//! Galerie picture entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A picture attached to a frame. Owns three image rows.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "galerie_picture")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub frame_id: String,

    pub original_image_id: String,

    pub cropped_image_id: String,

    /// Low resolution placeholder.
    pub pending_image_id: String,

    /// Position inside the frame.
    #[sea_orm(default_value = 0)]
    pub position: i32,

    /// Whether this picture is the galerie cover.
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
        belongs_to = "super::frame::Entity",
        from = "Column::FrameId",
        to = "super::frame::Column::Id"
    )]
    Frame,
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

impl Related<super::frame::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Frame.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
