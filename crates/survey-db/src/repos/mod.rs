//! Repository modules implementing the survey operations.
//!
//! Each module adds methods to `SurveyService` via `impl SurveyService` blocks.
//! Row-level helpers are free functions over `&libsql::Connection` so they
//! compose inside an open transaction.

pub mod answer;
pub mod dashboard;
pub(crate) mod question;
pub mod survey;
