//! Service layer: survey store, answer collector and dashboard aggregator.
//!
//! `SurveyService` wraps `SurveyDb` (relational state) and `BlobStore`
//! (survey images). Repository methods are implemented as
//! `impl SurveyService` blocks under [`crate::repos`].
//!
//! Mutations follow one protocol:
//! 1. Validate input and decode any image (no side effects yet)
//! 2. Save a new image to the blob store
//! 3. Begin transaction, execute SQL, commit
//! 4. On failure roll back and delete the image saved in step 2
//! 5. After commit, delete any image the mutation replaced

use std::path::Path;

use survey_config::SurveyConfig;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::SurveyDb;
use crate::blob::BlobStore;
use crate::error::{DatabaseError, SurveyError};

/// Knobs the service reads from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    /// Image reference for surveys without an uploaded image.
    pub default_image: String,
    /// Default page size for owner survey lists and answer logs.
    pub page_size: u32,
    /// Window size for the dashboard's latest answers.
    pub latest_answers_limit: u32,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::from(&SurveyConfig::default())
    }
}

impl From<&SurveyConfig> for ServiceSettings {
    fn from(config: &SurveyConfig) -> Self {
        Self {
            default_image: config.storage.default_image.clone(),
            page_size: config.general.page_size,
            latest_answers_limit: config.general.latest_answers_limit,
        }
    }
}

/// Survey operations over one database and one blob store.
///
/// All statements share a single libSQL connection, so an open transaction
/// is visible to every query on it. The gate serializes writers against
/// each other and keeps readers out of half-applied transactions.
pub struct SurveyService {
    db: SurveyDb,
    blob: BlobStore,
    settings: ServiceSettings,
    gate: RwLock<()>,
}

impl SurveyService {
    /// Build a service from configuration: opens the database (creating its
    /// parent directory) and the configured blob store.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError` if the database or blob store cannot be opened.
    pub async fn from_config(config: &SurveyConfig) -> Result<Self, SurveyError> {
        if !config.database.is_in_memory() {
            if let Some(parent) = Path::new(&config.database.path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        DatabaseError::Other(anyhow::anyhow!(
                            "failed to create database directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
            }
        }
        let db = SurveyDb::open_local(&config.database.path).await?;
        let blob = BlobStore::from_config(config)?;
        Ok(Self::from_db(db, blob, ServiceSettings::from(config)))
    }

    /// Create a service over an in-memory database and blob store.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn in_memory() -> Result<Self, DatabaseError> {
        let settings = ServiceSettings::default();
        let db = SurveyDb::open_local(":memory:").await?;
        let blob = BlobStore::in_memory(survey_config::StorageConfig::default().image_prefix);
        Ok(Self::from_db(db, blob, settings))
    }

    /// Create from existing parts.
    #[must_use]
    pub fn from_db(db: SurveyDb, blob: BlobStore, settings: ServiceSettings) -> Self {
        Self {
            db,
            blob,
            settings,
            gate: RwLock::new(()),
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &SurveyDb {
        &self.db
    }

    /// Access the image blob store.
    #[must_use]
    pub const fn blob(&self) -> &BlobStore {
        &self.blob
    }

    #[must_use]
    pub const fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    pub(crate) async fn read_gate(&self) -> RwLockReadGuard<'_, ()> {
        self.gate.read().await
    }

    pub(crate) async fn write_gate(&self) -> RwLockWriteGuard<'_, ()> {
        self.gate.write().await
    }

    /// Commit `tx` if `result` is `Ok`, roll it back otherwise.
    pub(crate) async fn finish<T>(
        tx: libsql::Transaction,
        result: Result<T, SurveyError>,
    ) -> Result<T, SurveyError> {
        match result {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::warn!(error = %rollback, "rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Delete the image a committed update replaced, or of a deleted survey.
    /// Runs after commit: failures are logged, not returned. The default
    /// image is never deleted.
    pub(crate) async fn release_image(&self, path: &str) {
        if path == self.settings().default_image {
            return;
        }
        if let Err(e) = self.blob.delete(path).await {
            tracing::warn!(path, error = %e, "failed to remove image after commit");
        }
    }

    /// Delete a blob saved for a mutation that did not commit.
    pub(crate) async fn discard_image(&self, path: Option<&str>) {
        if let Some(path) = path {
            if let Err(e) = self.blob.delete(path).await {
                tracing::warn!(path, error = %e, "failed to remove image of aborted mutation");
            }
        }
    }
}
