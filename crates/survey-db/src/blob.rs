//! Blob storage for survey images, over `object_store`.
//!
//! Paths handed out by [`BlobStore::save`] look like `images/<16 hex>.png`
//! and are what the `surveys.image` column stores.

use std::path::Path as FsPath;
use std::sync::Arc;

use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use survey_config::{R2Config, SurveyConfig};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("Object store error: {0}")]
    Store(#[from] object_store::Error),

    #[error("Invalid blob path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Failed to prepare image directory '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to generate a file name: {0}")]
    Random(String),
}

/// Save/delete/exists over a local directory, an R2 bucket or memory.
#[derive(Debug, Clone)]
pub struct BlobStore {
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl BlobStore {
    /// Wrap any `ObjectStore`. New objects are written under `prefix`.
    pub fn new(store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into().trim_matches('/').to_string(),
        }
    }

    /// Process-local store for tests.
    pub fn in_memory(prefix: impl Into<String>) -> Self {
        Self::new(Arc::new(InMemory::new()), prefix)
    }

    /// Store rooted at a local directory, created if missing.
    ///
    /// # Errors
    ///
    /// Returns `BlobError::Io` if the directory cannot be created, or
    /// `BlobError::Store` if it cannot be opened.
    pub fn local(root: impl AsRef<FsPath>, prefix: impl Into<String>) -> Result<Self, BlobError> {
        let root = root.as_ref();
        std::fs::create_dir_all(root).map_err(|source| BlobError::Io {
            path: root.display().to_string(),
            source,
        })?;
        let store = LocalFileSystem::new_with_prefix(root)?;
        Ok(Self::new(Arc::new(store), prefix))
    }

    /// Store backed by a Cloudflare R2 bucket (S3-compatible API).
    ///
    /// # Errors
    ///
    /// Returns `BlobError::Store` if the client cannot be built.
    pub fn r2(config: &R2Config, prefix: impl Into<String>) -> Result<Self, BlobError> {
        let store = AmazonS3Builder::new()
            .with_endpoint(config.endpoint_url())
            .with_region("auto")
            .with_bucket_name(&config.bucket_name)
            .with_access_key_id(&config.access_key_id)
            .with_secret_access_key(&config.secret_access_key)
            .build()?;
        Ok(Self::new(Arc::new(store), prefix))
    }

    /// R2 when configured, the local image directory otherwise.
    ///
    /// # Errors
    ///
    /// Same as [`Self::local`] and [`Self::r2`].
    pub fn from_config(config: &SurveyConfig) -> Result<Self, BlobError> {
        if config.r2.is_configured() {
            tracing::debug!(bucket = %config.r2.bucket_name, "using R2 image store");
            Self::r2(&config.r2, config.storage.image_prefix.clone())
        } else {
            tracing::debug!(dir = %config.storage.image_dir, "using local image store");
            Self::local(&config.storage.image_dir, config.storage.image_prefix.clone())
        }
    }

    /// Write `bytes` under a fresh random name and return its path.
    ///
    /// # Errors
    ///
    /// Returns `BlobError` if name generation or the write fails.
    pub async fn save(&self, bytes: Vec<u8>, extension: &str) -> Result<String, BlobError> {
        let name = format!("{}.{extension}", random_name()?);
        let key = if self.prefix.is_empty() {
            name
        } else {
            format!("{}/{name}", self.prefix)
        };
        let path = parse_path(&key)?;
        self.store.put(&path, PutPayload::from(bytes)).await?;
        tracing::debug!(path = %key, "saved blob");
        Ok(key)
    }

    /// Delete the object at `path`. Deleting a missing object succeeds.
    ///
    /// # Errors
    ///
    /// Returns `BlobError` for invalid paths or store failures.
    pub async fn delete(&self, path: &str) -> Result<(), BlobError> {
        match self.store.delete(&parse_path(path)?).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether an object exists at `path`.
    ///
    /// # Errors
    ///
    /// Returns `BlobError` for invalid paths or store failures other than
    /// "not found".
    pub async fn exists(&self, path: &str) -> Result<bool, BlobError> {
        match self.store.head(&parse_path(path)?).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Read the object back. Used by tests and export tooling.
    ///
    /// # Errors
    ///
    /// Returns `BlobError` if the object is missing or unreadable.
    pub async fn read(&self, path: &str) -> Result<Vec<u8>, BlobError> {
        let result = self.store.get(&parse_path(path)?).await?;
        Ok(result.bytes().await?.to_vec())
    }
}

fn parse_path(path: &str) -> Result<Path, BlobError> {
    Path::parse(path).map_err(|e| BlobError::InvalidPath {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

/// 8 random bytes as 16 lowercase hex chars.
fn random_name() -> Result<String, BlobError> {
    let mut bytes = [0u8; 8];
    getrandom::fill(&mut bytes).map_err(|e| BlobError::Random(e.to_string()))?;
    Ok(bytes.iter().map(|b| format!("{b:02x}")).collect())
}
