//! Blob storage abstraction for image files.
//!
//! Image rows name a bucket and a key; the backend owns the bytes. Supports
//! local filesystem storage, an in-memory store for tests, and S3-compatible
//! object storage behind the `s3` feature.

use std::{
    collections::{HashMap, HashSet},
    path::PathBuf,
    sync::Arc,
};

use serde::Deserialize;
use tokio::sync::RwLock;

use crate::{AppError, AppResult};

/// Shared handle to the configured storage backend.
pub type StorageService = Arc<dyn StorageBackend>;

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Local filesystem storage.
    Local {
        /// Base path for stored files. Each bucket is a sub-directory.
        #[serde(default = "default_base_path")]
        base_path: PathBuf,
        /// Base URL for serving files.
        #[serde(default = "default_base_url")]
        base_url: String,
    },
    /// S3-compatible object storage.
    S3 {
        /// S3 endpoint URL (e.g., "<https://s3.amazonaws.com>" or `MinIO` URL).
        endpoint: String,
        /// AWS region.
        region: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Public URL prefix for serving files.
        #[serde(default)]
        public_url: Option<String>,
        /// Path prefix within each bucket.
        #[serde(default)]
        prefix: Option<String>,
    },
}

fn default_base_path() -> PathBuf {
    PathBuf::from("./files")
}

fn default_base_url() -> String {
    "/files".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Local {
            base_path: default_base_path(),
            base_url: default_base_url(),
        }
    }
}

impl StorageConfig {
    /// Build the backend described by this configuration.
    pub async fn build(&self) -> AppResult<StorageService> {
        match self {
            Self::Local {
                base_path,
                base_url,
            } => Ok(Arc::new(LocalStorage::new(
                base_path.clone(),
                base_url.clone(),
            ))),
            #[cfg(feature = "s3")]
            Self::S3 {
                endpoint,
                region,
                access_key_id,
                secret_access_key,
                public_url,
                prefix,
            } => {
                let storage = S3Storage::new(
                    endpoint,
                    region,
                    access_key_id,
                    secret_access_key,
                    public_url.clone(),
                    prefix.clone(),
                )
                .await?;
                Ok(Arc::new(storage))
            }
            #[cfg(not(feature = "s3"))]
            Self::S3 { .. } => Err(AppError::Config(
                "storage backend \"s3\" requires the `s3` feature".to_string(),
            )),
        }
    }
}

/// Stored blob metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedBlob {
    /// Bucket the blob lives in.
    pub bucket: String,
    /// Object key within the bucket.
    pub key: String,
    /// Public URL to access the blob.
    pub url: String,
    /// Blob size in bytes.
    pub size: u64,
}

/// Storage backend trait.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Upload a blob.
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<UploadedBlob>;

    /// Delete a blob. Deleting an absent blob succeeds.
    async fn delete(&self, bucket: &str, key: &str) -> AppResult<()>;

    /// Check if a blob exists.
    async fn exists(&self, bucket: &str, key: &str) -> AppResult<bool>;

    /// Get the public URL for a blob.
    fn public_url(&self, bucket: &str, key: &str) -> String;
}

fn check_segment(kind: &str, value: &str) -> AppResult<()> {
    if value.is_empty() || value.contains("..") || value.starts_with('/') {
        return Err(AppError::Storage(format!("invalid {kind}: {value:?}")));
    }
    Ok(())
}

/// Local filesystem storage backend.
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new local storage backend.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self {
            base_path,
            base_url,
        }
    }

    fn path_of(&self, bucket: &str, key: &str) -> AppResult<PathBuf> {
        check_segment("bucket", bucket)?;
        check_segment("key", key)?;
        Ok(self.base_path.join(bucket).join(key))
    }
}

#[async_trait::async_trait]
impl StorageBackend for LocalStorage {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: &[u8],
        _content_type: &str,
    ) -> AppResult<UploadedBlob> {
        let path = self.path_of(bucket, key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create directory: {e}")))?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file: {e}")))?;

        Ok(UploadedBlob {
            bucket: bucket.to_string(),
            key: key.to_string(),
            url: self.public_url(bucket, key),
            size: data.len() as u64,
        })
    }

    async fn delete(&self, bucket: &str, key: &str) -> AppResult<()> {
        let path = self.path_of(bucket, key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("Failed to delete file: {e}"))),
        }
    }

    async fn exists(&self, bucket: &str, key: &str) -> AppResult<bool> {
        let path = self.path_of(bucket, key)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to stat file: {e}")))
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.base_url.trim_end_matches('/'), bucket, key)
    }
}

/// In-memory storage backend.
///
/// Keys registered with [`MemoryStorage::fail_deletes_of`] reject deletion,
/// which lets callers exercise partial blob failures.
#[derive(Default)]
pub struct MemoryStorage {
    blobs: RwLock<HashMap<(String, String), Vec<u8>>>,
    failing: RwLock<HashSet<String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later deletion of `key` fail.
    pub async fn fail_deletes_of(&self, key: &str) {
        self.failing.write().await.insert(key.to_string());
    }

    /// Let deletions succeed again.
    pub async fn allow_all_deletes(&self) {
        self.failing.write().await.clear();
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// Whether no blob is stored.
    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl StorageBackend for MemoryStorage {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: &[u8],
        _content_type: &str,
    ) -> AppResult<UploadedBlob> {
        check_segment("bucket", bucket)?;
        check_segment("key", key)?;
        self.blobs
            .write()
            .await
            .insert((bucket.to_string(), key.to_string()), data.to_vec());

        Ok(UploadedBlob {
            bucket: bucket.to_string(),
            key: key.to_string(),
            url: self.public_url(bucket, key),
            size: data.len() as u64,
        })
    }

    async fn delete(&self, bucket: &str, key: &str) -> AppResult<()> {
        if self.failing.read().await.contains(key) {
            return Err(AppError::Storage(format!(
                "refusing to delete {bucket}/{key}"
            )));
        }
        self.blobs
            .write()
            .await
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }

    async fn exists(&self, bucket: &str, key: &str) -> AppResult<bool> {
        Ok(self
            .blobs
            .read()
            .await
            .contains_key(&(bucket.to_string(), key.to_string())))
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("memory://{bucket}/{key}")
    }
}

/// S3-compatible object storage backend.
#[cfg(feature = "s3")]
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    public_url: Option<String>,
    prefix: Option<String>,
}

#[cfg(feature = "s3")]
impl S3Storage {
    /// Create a new S3 storage backend.
    pub async fn new(
        endpoint: &str,
        region: &str,
        access_key_id: &str,
        secret_access_key: &str,
        public_url: Option<String>,
        prefix: Option<String>,
    ) -> AppResult<Self> {
        use aws_config::Region;
        use aws_sdk_s3::config::Credentials;

        let credentials =
            Credentials::new(access_key_id, secret_access_key, None, None, "galerie-rs");

        let config = aws_sdk_s3::Config::builder()
            .endpoint_url(endpoint)
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(config),
            public_url,
            prefix,
        })
    }

    fn full_key(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}/{}", prefix.trim_end_matches('/'), key),
            None => key.to_string(),
        }
    }
}

#[cfg(feature = "s3")]
#[async_trait::async_trait]
impl StorageBackend for S3Storage {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<UploadedBlob> {
        use aws_sdk_s3::primitives::ByteStream;

        self.client
            .put_object()
            .bucket(bucket)
            .key(self.full_key(key))
            .body(ByteStream::from(data.to_vec()))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        Ok(UploadedBlob {
            bucket: bucket.to_string(),
            key: key.to_string(),
            url: self.public_url(bucket, key),
            size: data.len() as u64,
        })
    }

    async fn delete(&self, bucket: &str, key: &str) -> AppResult<()> {
        // DeleteObject succeeds for absent keys.
        self.client
            .delete_object()
            .bucket(bucket)
            .key(self.full_key(key))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 delete failed: {e}")))?;

        Ok(())
    }

    async fn exists(&self, bucket: &str, key: &str) -> AppResult<bool> {
        match self
            .client
            .head_object()
            .bucket(bucket)
            .key(self.full_key(key))
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let not_found = e
                    .as_service_error()
                    .is_some_and(aws_sdk_s3::operation::head_object::HeadObjectError::is_not_found);
                if not_found {
                    Ok(false)
                } else {
                    Err(AppError::Storage(format!("S3 head_object failed: {e}")))
                }
            }
        }
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        let full_key = self.full_key(key);
        match &self.public_url {
            Some(base) => format!("{}/{}/{}", base.trim_end_matches('/'), bucket, full_key),
            None => format!("https://{bucket}.s3.amazonaws.com/{full_key}"),
        }
    }
}
