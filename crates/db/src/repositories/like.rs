//! Like repository.

use std::sync::Arc;

use galerie_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect,
    QueryTrait,
};

use crate::entities::{Frame, Like, frame, like};

/// Repository for like operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find every like of a frame.
    pub async fn find_by_frame(&self, frame_id: &str) -> AppResult<Vec<like::Model>> {
        Like::find()
            .filter(like::Column::FrameId.eq(frame_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find every like a user placed.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<like::Model>> {
        Like::find()
            .filter(like::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the likes a user placed on frames of one galerie.
    pub async fn find_by_user_in_galerie(
        &self,
        user_id: &str,
        galerie_id: &str,
    ) -> AppResult<Vec<like::Model>> {
        let frames_of_galerie = Frame::find()
            .select_only()
            .column(frame::Column::Id)
            .filter(frame::Column::GalerieId.eq(galerie_id))
            .into_query();

        Like::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::FrameId.in_subquery(frames_of_galerie))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete every like of a frame.
    pub async fn delete_by_frame(&self, frame_id: &str) -> AppResult<u64> {
        let result = Like::delete_many()
            .filter(like::Column::FrameId.eq(frame_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Delete one like.
    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        let result = Like::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}
