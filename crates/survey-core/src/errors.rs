//! Error types raised by the pure survey logic.
//!
//! Storage and service errors (`DatabaseError`, `SurveyError`) live in
//! `survey-db`, which wraps these.

use thiserror::Error;

/// A question record failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionValidationError {
    /// A required field was absent.
    #[error("the {0} field is required")]
    MissingField(&'static str),

    /// The `type` field named a type outside the closed set.
    #[error("invalid question type '{0}'")]
    InvalidQuestionType(String),

    /// The label was present but blank.
    #[error("the question field must not be empty")]
    EmptyLabel,
}

impl QuestionValidationError {
    /// The input field the failure refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingField(field) => field,
            Self::InvalidQuestionType(_) => "type",
            Self::EmptyLabel => "question",
        }
    }
}

/// An incoming question list could not be reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// The question at `index` (zero-based, in submission order) is invalid.
    #[error("question #{index} is invalid: {source}")]
    ValidationFailed {
        index: usize,
        id: Option<String>,
        #[source]
        source: QuestionValidationError,
    },
}

/// A submitted answer value has an unsupported shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerShapeError {
    #[error("answer must not be null")]
    Null,

    #[error("answer must be text, a number, a boolean or a list of those")]
    Unsupported,

    #[error("list answers may only contain text, numbers or booleans")]
    NonScalarItem,
}

/// An image payload is not an acceptable data URI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageFormatError {
    #[error("image must be a base64 data URI")]
    NotDataUri,

    #[error("unsupported image type '{0}'")]
    UnsupportedType(String),

    #[error("image payload is not valid base64: {0}")]
    InvalidEncoding(String),

    #[error("image payload is empty")]
    Empty,
}
