//! Error types for survey-db.
//!
//! `DatabaseError` covers storage failures. `SurveyError` is the taxonomy
//! callers of the service see; storage and blob failures surface through it
//! as internal errors.

use survey_core::errors::{ImageFormatError, ReconcileError};
use thiserror::Error;

use crate::blob::BlobError;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors returned by `SurveyService` operations.
#[derive(Debug, Error)]
pub enum SurveyError {
    /// A submitted field failed validation. `field` is a dotted path such as
    /// `questions.2.type` or `answers.qst-1a2b3c4d`.
    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    /// The caller does not own the survey it tried to read or mutate.
    #[error("Caller is not the owner of survey {survey_id}")]
    Unauthorized { survey_id: String },

    /// The survey exists but is not open to guests (draft or expired).
    #[error("Survey {survey_id} is not open")]
    Forbidden { survey_id: String },

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid image: {0}")]
    InvalidImageFormat(#[from] ImageFormatError),

    /// An answer referenced a question that is not live in the survey.
    #[error("Question '{0}' does not belong to this survey")]
    InvalidQuestionReference(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Blob(#[from] BlobError),
}

impl SurveyError {
    pub(crate) fn survey_not_found(id: &str) -> Self {
        Self::NotFound {
            entity: "survey",
            id: id.to_string(),
        }
    }

    /// HTTP-equivalent status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::ValidationFailed { .. } => 422,
            Self::Unauthorized { .. } | Self::Forbidden { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::InvalidImageFormat(_) | Self::InvalidQuestionReference(_) => 400,
            Self::Database(_) | Self::Blob(_) => 500,
        }
    }

    /// Message safe to show an untrusted caller.
    ///
    /// Denials, lookups and internal failures carry no detail; validation
    /// and reference errors keep theirs.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Unauthorized { .. } => "This action is unauthorized.".into(),
            Self::Forbidden { .. } => "You do not have permission to access this survey.".into(),
            Self::NotFound { .. } => "Not found.".into(),
            Self::Database(_) | Self::Blob(_) => "Internal error.".into(),
            Self::ValidationFailed { .. }
            | Self::InvalidImageFormat(_)
            | Self::InvalidQuestionReference(_) => self.to_string(),
        }
    }
}

impl From<ReconcileError> for SurveyError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::ValidationFailed { index, source, .. } => Self::ValidationFailed {
                field: format!("questions.{index}.{}", source.field()),
                message: source.to_string(),
            },
        }
    }
}

impl From<libsql::Error> for SurveyError {
    fn from(err: libsql::Error) -> Self {
        Self::Database(DatabaseError::LibSql(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_core::errors::QuestionValidationError;

    #[test]
    fn status_codes() {
        let cases = [
            (
                SurveyError::ValidationFailed {
                    field: "title".into(),
                    message: "required".into(),
                },
                422,
            ),
            (
                SurveyError::Unauthorized {
                    survey_id: "svy-1".into(),
                },
                403,
            ),
            (
                SurveyError::Forbidden {
                    survey_id: "svy-1".into(),
                },
                403,
            ),
            (SurveyError::survey_not_found("svy-1"), 404),
            (SurveyError::InvalidImageFormat(ImageFormatError::NotDataUri), 400),
            (SurveyError::InvalidQuestionReference("qst-9".into()), 400),
            (SurveyError::Database(DatabaseError::NoResult), 500),
        ];
        for (err, code) in cases {
            assert_eq!(err.status_code(), code, "{err}");
        }
    }

    #[test]
    fn reconcile_error_keeps_field_path() {
        let err: SurveyError = ReconcileError::ValidationFailed {
            index: 2,
            id: None,
            source: QuestionValidationError::InvalidQuestionType("date".into()),
        }
        .into();
        match err {
            SurveyError::ValidationFailed { field, message } => {
                assert_eq!(field, "questions.2.type");
                assert!(message.contains("date"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn public_message_hides_internal_detail() {
        let err = SurveyError::Database(DatabaseError::Query("secret table name".into()));
        assert_eq!(err.public_message(), "Internal error.");

        let err = SurveyError::survey_not_found("svy-deadbeef");
        assert!(!err.public_message().contains("svy-deadbeef"));

        let err = SurveyError::InvalidQuestionReference("qst-1".into());
        assert!(err.public_message().contains("qst-1"));
    }
}
