//! Picture repository.
//!
//! Galerie pictures and profile pictures share a shape: each owns an
//! original, a cropped and a pending image.

use std::sync::Arc;

use galerie_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::entities::{GaleriePicture, ProfilePicture, galerie_picture, profile_picture};

/// Repository for galerie and profile pictures.
#[derive(Clone)]
pub struct PictureRepository {
    db: Arc<DatabaseConnection>,
}

impl PictureRepository {
    /// Create a new picture repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // ==================== Galerie Pictures ====================

    /// Find the pictures of a frame.
    pub async fn find_galerie_pictures_by_frame(
        &self,
        frame_id: &str,
    ) -> AppResult<Vec<galerie_picture::Model>> {
        GaleriePicture::find()
            .filter(galerie_picture::Column::FrameId.eq(frame_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a galerie picture row.
    pub async fn delete_galerie_picture(&self, id: &str) -> AppResult<u64> {
        let result = GaleriePicture::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    // ==================== Profile Pictures ====================

    /// Find a profile picture by ID.
    pub async fn find_profile_picture(
        &self,
        id: &str,
    ) -> AppResult<Option<profile_picture::Model>> {
        ProfilePicture::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find every profile picture of a user.
    pub async fn find_profile_pictures_of_user(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<profile_picture::Model>> {
        ProfilePicture::find()
            .filter(profile_picture::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a profile picture row.
    pub async fn delete_profile_picture(&self, id: &str) -> AppResult<u64> {
        let result = ProfilePicture::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}
