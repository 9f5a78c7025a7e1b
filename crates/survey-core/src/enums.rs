//! Question types and survey lifecycle status.
//!
//! Enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`,
//! which matches the strings stored in SQL.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// QuestionType
// ---------------------------------------------------------------------------

/// The closed set of question kinds a survey may contain.
///
/// `Text` and `Textarea` take free-form input. `Select`, `Radio` and
/// `Checkbox` carry an ordered option list in their `data` payload;
/// `Checkbox` is the only multi-value kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Text,
    Textarea,
    Select,
    Radio,
    Checkbox,
}

impl QuestionType {
    pub const ALL: [Self; 5] = [
        Self::Text,
        Self::Textarea,
        Self::Select,
        Self::Radio,
        Self::Checkbox,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
        }
    }

    /// Look up a type by its stored name. Matching is exact (case-sensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Whether the type carries an option list.
    #[must_use]
    pub const fn is_choice(self) -> bool {
        matches!(self, Self::Select | Self::Radio | Self::Checkbox)
    }

    /// Whether an answer may hold several values.
    #[must_use]
    pub const fn is_multi_value(self) -> bool {
        matches!(self, Self::Checkbox)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SurveyStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a survey.
///
/// Stored as an integer flag (`0` = draft, `1` = published).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SurveyStatus {
    #[default]
    Draft,
    Published,
}

impl SurveyStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }

    #[must_use]
    pub const fn as_flag(self) -> i64 {
        match self {
            Self::Draft => 0,
            Self::Published => 1,
        }
    }

    /// Any non-zero flag reads as published.
    #[must_use]
    pub const fn from_flag(flag: i64) -> Self {
        if flag == 0 { Self::Draft } else { Self::Published }
    }

    #[must_use]
    pub const fn is_published(self) -> bool {
        matches!(self, Self::Published)
    }
}

impl fmt::Display for SurveyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
