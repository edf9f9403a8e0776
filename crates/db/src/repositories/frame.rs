//! Frame repository.

use std::sync::Arc;

use galerie_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    sea_query::Expr,
};

use crate::entities::{Frame, Like, frame, like};

/// Repository for frame operations.
#[derive(Clone)]
pub struct FrameRepository {
    db: Arc<DatabaseConnection>,
}

impl FrameRepository {
    /// Create a new frame repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find frame by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<frame::Model>> {
        Frame::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find every frame of a galerie.
    pub async fn find_by_galerie(&self, galerie_id: &str) -> AppResult<Vec<frame::Model>> {
        Frame::find()
            .filter(frame::Column::GalerieId.eq(galerie_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find every frame a user posted, across galeries.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<frame::Model>> {
        Frame::find()
            .filter(frame::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the frames a user posted in one galerie.
    pub async fn find_by_galerie_and_user(
        &self,
        galerie_id: &str,
        user_id: &str,
    ) -> AppResult<Vec<frame::Model>> {
        Frame::find()
            .filter(frame::Column::GalerieId.eq(galerie_id))
            .filter(frame::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a frame row. Returns the number of rows removed.
    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        let result = Frame::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Recompute `num_of_likes` from the like rows of a frame.
    ///
    /// Safe to repeat; the counter can never drift below zero.
    pub async fn resync_likes(&self, id: &str) -> AppResult<i32> {
        let count = Like::find()
            .filter(like::Column::FrameId.eq(id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let count = i32::try_from(count)
            .map_err(|_| AppError::InvariantViolation(format!("like count overflow on {id}")))?;

        Frame::update_many()
            .col_expr(frame::Column::NumOfLikes, Expr::value(count))
            .filter(frame::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_frame(id: &str, galerie_id: &str, user_id: &str) -> frame::Model {
        frame::Model {
            id: id.to_string(),
            galerie_id: galerie_id.to_string(),
            user_id: user_id.to_string(),
            description: None,
            num_of_likes: 0,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_galerie_and_user() {
        let frames = vec![
            create_test_frame("f1", "g1", "u1"),
            create_test_frame("f2", "g1", "u1"),
        ];
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([frames])
                .into_connection(),
        );

        let repo = FrameRepository::new(db);
        let found = repo.find_by_galerie_and_user("g1", "u1").await.unwrap();

        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|f| f.galerie_id == "g1" && f.user_id == "u1"));
    }

    #[tokio::test]
    async fn test_resync_likes_writes_count() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(3))
                }]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = FrameRepository::new(db);
        assert_eq!(repo.resync_likes("f1").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_delete_missing_frame() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = FrameRepository::new(db);
        assert_eq!(repo.delete("missing").await.unwrap(), 0);
    }
}
