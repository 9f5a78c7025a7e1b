//! # survey-db
//!
//! libSQL persistence for surveys, questions and answers.
//!
//! `SurveyDb` owns the connection, schema and id generation. `SurveyService`
//! layers the survey store, answer collector and dashboard aggregator on top
//! via `impl SurveyService` blocks in [`repos`], and writes survey images
//! through the [`blob::BlobStore`].

pub mod blob;
pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Database handle: one libSQL database and its connection.
pub struct SurveyDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl SurveyDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let survey_db = Self { db, conn };
        survey_db.run_migrations().await?;
        Ok(survey_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"svy-a3f8b2c1d4e5f607"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        generate_id_on(&self.conn, prefix).await
    }
}

/// Generate a prefixed ID on a specific connection (or open transaction).
///
/// Uses `randomblob(8)` in SQL to produce 16-char hex, then prepends the prefix.
pub(crate) async fn generate_id_on(
    conn: &libsql::Connection,
    prefix: &str,
) -> Result<String, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT '{prefix}-' || lower(hex(randomblob(8)))"),
            (),
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<String>(0)?)
}
