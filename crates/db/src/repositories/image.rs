//! Image repository.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use galerie_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait,
};

use crate::entities::{GaleriePicture, Image, ProfilePicture, galerie_picture, image, profile_picture};

/// Repository for image metadata rows.
#[derive(Clone)]
pub struct ImageRepository {
    db: Arc<DatabaseConnection>,
}

impl ImageRepository {
    /// Create a new image repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find images by IDs. Missing IDs are skipped.
    pub async fn find_by_ids(&self, ids: &[&str]) -> AppResult<Vec<image::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Image::find()
            .filter(image::Column::Id.is_in(ids.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an image row.
    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        let result = Image::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Find images created before `older_than` that no picture references.
    pub async fn find_unreferenced(
        &self,
        older_than: DateTime<FixedOffset>,
        limit: u64,
    ) -> AppResult<Vec<image::Model>> {
        let referenced = [
            GaleriePicture::find()
                .select_only()
                .column(galerie_picture::Column::OriginalImageId)
                .into_query(),
            GaleriePicture::find()
                .select_only()
                .column(galerie_picture::Column::CroppedImageId)
                .into_query(),
            GaleriePicture::find()
                .select_only()
                .column(galerie_picture::Column::PendingImageId)
                .into_query(),
            ProfilePicture::find()
                .select_only()
                .column(profile_picture::Column::OriginalImageId)
                .into_query(),
            ProfilePicture::find()
                .select_only()
                .column(profile_picture::Column::CroppedImageId)
                .into_query(),
            ProfilePicture::find()
                .select_only()
                .column(profile_picture::Column::PendingImageId)
                .into_query(),
        ];

        let unreferenced = referenced
            .into_iter()
            .fold(Condition::all(), |cond, query| {
                cond.add(image::Column::Id.not_in_subquery(query))
            });

        Image::find()
            .filter(image::Column::CreatedAt.lt(older_than))
            .filter(unreferenced)
            .order_by(image::Column::CreatedAt, Order::Asc)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_image(id: &str) -> image::Model {
        image::Model {
            id: id.to_string(),
            bucket_name: "galerie-pictures".to_string(),
            file_name: format!("{id}.jpeg"),
            format: "jpeg".to_string(),
            width: 640,
            height: 480,
            size: 1024,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_ids_empty_skips_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = ImageRepository::new(db);
        assert!(repo.find_by_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_unreferenced() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_image("i1")]])
                .into_connection(),
        );

        let repo = ImageRepository::new(db);
        let found = repo
            .find_unreferenced(Utc::now().into(), 10)
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].file_name, "i1.jpeg");
    }
}
