//! Blob cleanup coordinator.
//!
//! Destroys an image row together with its blob: blob first, then row. A
//! blob that cannot be removed is reported and logged, and its row stays so
//! the orphan sweep can retry it once the picture above is gone; a missing
//! blob is not a failure. Blob deletions are bounded by a semaphore shared
//! by every cascade running through this coordinator.

use std::sync::Arc;

use chrono::{Duration, Utc};
use futures::future::join_all;
use galerie_common::{AppError, AppResult, StorageService};
use galerie_db::entities::image;
use galerie_db::repositories::ImageRepository;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::services::report::{BlobFailure, CascadeReport};

/// Images younger than this are never swept; their picture row may still
/// be on its way.
const ORPHAN_GRACE_MINUTES: i64 = 60;

/// Coordinates image row and blob removal.
#[derive(Clone)]
pub struct BlobCleanupCoordinator {
    images: ImageRepository,
    storage: StorageService,
    permits: Arc<Semaphore>,
}

impl BlobCleanupCoordinator {
    /// Create a coordinator allowing `blob_concurrency` blob deletions in
    /// flight.
    #[must_use]
    pub fn new(images: ImageRepository, storage: StorageService, blob_concurrency: usize) -> Self {
        Self {
            images,
            storage,
            permits: Arc::new(Semaphore::new(blob_concurrency.max(1))),
        }
    }

    /// Destroy image rows and their blobs. Ids without a row are skipped.
    ///
    /// Every image is attempted; the first store failure is returned once
    /// all of them settled.
    pub async fn destroy_images(&self, ids: &[&str]) -> AppResult<CascadeReport> {
        let images = self.images.find_by_ids(ids).await?;
        debug!(requested = ids.len(), found = images.len(), "Destroying images");

        let results = join_all(images.into_iter().map(|image| self.destroy_image(image))).await;

        let mut report = CascadeReport::default();
        let mut first_error = None;
        for result in results {
            match result {
                Ok(Ok(id)) => report.images.push(id),
                Ok(Err(failure)) => report.blob_failures.push(failure),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }

    /// Returns the id of the removed row, or the blob failure that kept it.
    async fn destroy_image(&self, image: image::Model) -> AppResult<Result<String, BlobFailure>> {
        {
            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|e| AppError::Internal(format!("blob permits closed: {e}")))?;

            if let Err(e) = self
                .storage
                .delete(&image.bucket_name, &image.file_name)
                .await
            {
                warn!(
                    image_id = %image.id,
                    bucket = %image.bucket_name,
                    key = %image.file_name,
                    error = %e,
                    "Failed to delete blob from storage, leaving image row for the sweep"
                );
                return Ok(Err(BlobFailure {
                    image_id: image.id,
                    bucket: image.bucket_name,
                    key: image.file_name,
                    error: e.to_string(),
                }));
            }
        }

        self.images.delete(&image.id).await?;
        Ok(Ok(image.id))
    }

    /// Destroy up to `batch` image rows no picture references any more,
    /// along with their blobs.
    ///
    /// Such rows are left behind when a cascade was interrupted between a
    /// picture row and its images, or when their blob could not be deleted.
    pub async fn sweep_orphans(&self, batch: u64) -> AppResult<CascadeReport> {
        let cutoff = Utc::now() - Duration::minutes(ORPHAN_GRACE_MINUTES);
        let orphans = self.images.find_unreferenced(cutoff.into(), batch).await?;
        if orphans.is_empty() {
            return Ok(CascadeReport::default());
        }

        let ids: Vec<&str> = orphans.iter().map(|image| image.id.as_str()).collect();
        let report = self.destroy_images(&ids).await?;

        info!(
            images = report.images.len(),
            blob_failures = report.blob_failures.len(),
            "Swept orphaned images"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galerie_common::{MemoryStorage, StorageBackend};
    use galerie_db::entities::Image;
    use galerie_db::entities::user::UserRole;
    use galerie_db::test_utils::{PROFILE_BUCKET, TestDatabase};

    async fn put_blob(storage: &MemoryStorage, image: &image::Model) {
        storage
            .upload(&image.bucket_name, &image.file_name, b"jpeg", "image/jpeg")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_destroy_images_removes_rows_and_blobs() {
        let db = TestDatabase::new().await.unwrap();
        let storage = Arc::new(MemoryStorage::new());
        let seeder = db.seeder();
        let a = seeder.image(PROFILE_BUCKET).await.unwrap();
        let b = seeder.image(PROFILE_BUCKET).await.unwrap();
        put_blob(&storage, &a).await;
        put_blob(&storage, &b).await;

        let coordinator =
            BlobCleanupCoordinator::new(ImageRepository::new(db.conn.clone()), storage.clone(), 2);
        let report = coordinator.destroy_images(&[a.id.as_str(), b.id.as_str()]).await.unwrap();

        assert_eq!(report.images.len(), 2);
        assert!(report.blob_failures.is_empty());
        assert!(storage.is_empty().await);
        assert_eq!(db.count(Image).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_blob_is_not_a_failure() {
        let db = TestDatabase::new().await.unwrap();
        let storage = Arc::new(MemoryStorage::new());
        let image = db.seeder().image(PROFILE_BUCKET).await.unwrap();

        let coordinator =
            BlobCleanupCoordinator::new(ImageRepository::new(db.conn.clone()), storage, 1);
        let report = coordinator.destroy_images(&[image.id.as_str()]).await.unwrap();

        assert_eq!(report.images, vec![image.id]);
        assert!(report.blob_failures.is_empty());
    }

    #[tokio::test]
    async fn test_blob_failure_keeps_row_for_sweep() {
        let db = TestDatabase::new().await.unwrap();
        let storage = Arc::new(MemoryStorage::new());
        let image = db.seeder().image(PROFILE_BUCKET).await.unwrap();
        put_blob(&storage, &image).await;
        storage.fail_deletes_of(&image.file_name).await;

        let coordinator =
            BlobCleanupCoordinator::new(ImageRepository::new(db.conn.clone()), storage.clone(), 1);
        let report = coordinator.destroy_images(&[image.id.as_str()]).await.unwrap();

        assert!(report.images.is_empty());
        assert_eq!(report.blob_failures.len(), 1);
        assert_eq!(report.blob_failures[0].image_id, image.id);
        assert_eq!(db.count(Image).await.unwrap(), 1);
        assert_eq!(storage.len().await, 1);

        storage.allow_all_deletes().await;
        let swept = coordinator.sweep_orphans(100).await.unwrap();

        assert_eq!(swept.images, vec![image.id.clone()]);
        assert!(swept.blob_failures.is_empty());
        assert_eq!(db.count(Image).await.unwrap(), 0);
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_skipped() {
        let db = TestDatabase::new().await.unwrap();
        let coordinator = BlobCleanupCoordinator::new(
            ImageRepository::new(db.conn.clone()),
            Arc::new(MemoryStorage::new()),
            1,
        );

        let report = coordinator.destroy_images(&["gone"]).await.unwrap();
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_sweep_orphans_keeps_referenced_images() {
        let db = TestDatabase::new().await.unwrap();
        let storage = Arc::new(MemoryStorage::new());
        let seeder = db.seeder();
        let alice = seeder.user("alice", UserRole::User).await.unwrap();
        let (_, owned) = seeder.profile_picture(&alice.id, true).await.unwrap();
        let orphan = seeder.image(PROFILE_BUCKET).await.unwrap();
        for image in owned.iter().chain([&orphan]) {
            put_blob(&storage, image).await;
        }

        let coordinator =
            BlobCleanupCoordinator::new(ImageRepository::new(db.conn.clone()), storage.clone(), 4);
        let report = coordinator.sweep_orphans(100).await.unwrap();

        assert_eq!(report.images, vec![orphan.id.clone()]);
        assert_eq!(db.count(Image).await.unwrap(), 3);
        assert_eq!(storage.len().await, 3);
        assert!(
            !storage
                .exists(&orphan.bucket_name, &orphan.file_name)
                .await
                .unwrap()
        );

        assert!(coordinator.sweep_orphans(100).await.unwrap().is_empty());
    }
}
