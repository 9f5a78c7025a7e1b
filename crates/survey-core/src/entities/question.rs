use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::QuestionType;

/// One typed prompt within a survey.
///
/// `data` is the type-specific configuration exactly as stored: an opaque
/// canonical string. Use [`Question::config`] for a typed view.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub survey_id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub question: String,
    pub description: Option<String>,
    pub data: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Question {
    #[must_use]
    pub fn config(&self) -> QuestionConfig {
        QuestionConfig::from_stored(self.question_type, self.data.as_deref())
    }
}

/// Typed view over a question's `data` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionConfig {
    Text,
    Choice { options: Vec<String> },
}

impl QuestionConfig {
    /// Decode a stored payload for the given type.
    ///
    /// Decoding is lenient: the payload is never rejected. Choice options are
    /// read from a bare array (`["A", "B"]`) or an object with an `options`
    /// array whose entries are strings or `{"text": ...}` objects. Anything
    /// else yields an empty option list.
    #[must_use]
    pub fn from_stored(question_type: QuestionType, data: Option<&str>) -> Self {
        if !question_type.is_choice() {
            return Self::Text;
        }
        let options = data
            .and_then(|raw| serde_json::from_str::<Value>(raw).ok())
            .map(|value| extract_options(&value))
            .unwrap_or_default();
        Self::Choice { options }
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        match self {
            Self::Text => &[],
            Self::Choice { options } => options,
        }
    }
}

fn extract_options(value: &Value) -> Vec<String> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("options") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Object(entry) => entry.get("text").and_then(Value::as_str).map(String::from),
            _ => None,
        })
        .collect()
}
