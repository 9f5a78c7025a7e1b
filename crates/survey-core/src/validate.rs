//! Question validation and answer normalization.
//!
//! Both functions are pure: they never touch storage. Referential checks
//! (does the survey exist, does the question belong to it) are the store's job.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::enums::QuestionType;
use crate::errors::{AnswerShapeError, QuestionValidationError};

/// A question record as submitted by an author, before validation.
///
/// Every field is optional at this stage so that missing fields surface as
/// validation failures instead of deserialization errors. `id` accepts a
/// string or a number; `null`, `""` and absence all mean "new question".
/// `data` distinguishes absence (`None`) from an explicit `null`
/// (`Some(Value::Null)`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionInput {
    #[serde(
        default,
        deserialize_with = "deserialize_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub question_type: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub data: Option<Value>,
}

impl QuestionInput {
    /// A new (id-less) question with an empty `data` payload.
    #[must_use]
    pub fn new(question_type: QuestionType, question: impl Into<String>) -> Self {
        Self {
            id: None,
            question_type: Some(question_type.as_str().to_string()),
            question: Some(question.into()),
            description: None,
            data: Some(Value::Array(Vec::new())),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "question id must be a string or number, got {other}"
        ))),
    }
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// A question that passed validation, normalized for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidQuestion {
    pub question_type: QuestionType,
    pub question: String,
    pub description: Option<String>,
    /// Canonical serialized `data` payload. `None` when `data` was `null`.
    pub data: Option<String>,
}

/// Validate one question record.
///
/// # Errors
///
/// Returns `QuestionValidationError` when `type` is missing or unknown, the
/// label is missing or blank, or `data` is absent.
pub fn validate_question(input: &QuestionInput) -> Result<ValidQuestion, QuestionValidationError> {
    let raw_type = input
        .question_type
        .as_deref()
        .ok_or(QuestionValidationError::MissingField("type"))?;
    let question_type = QuestionType::from_name(raw_type.trim())
        .ok_or_else(|| QuestionValidationError::InvalidQuestionType(raw_type.to_string()))?;

    let label = input
        .question
        .as_deref()
        .ok_or(QuestionValidationError::MissingField("question"))?
        .trim();
    if label.is_empty() {
        return Err(QuestionValidationError::EmptyLabel);
    }

    let description = input
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(String::from);

    let data = match input
        .data
        .as_ref()
        .ok_or(QuestionValidationError::MissingField("data"))?
    {
        Value::Null => None,
        Value::String(raw) => Some(raw.clone()),
        structured => Some(structured.to_string()),
    };

    Ok(ValidQuestion {
        question_type,
        question: label.to_string(),
        description,
        data,
    })
}

/// A respondent's answers keyed by question id.
///
/// Keys are iterated in sorted order, so "first offending id" is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    pub answers: BTreeMap<String, Value>,
}

impl AnswerSubmission {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn answer(mut self, question_id: impl Into<String>, value: impl Into<Value>) -> Self {
        self.answers.insert(question_id.into(), value.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

/// Convert a submitted answer value to its stored text form.
///
/// Strings are stored verbatim, numbers and booleans as their JSON text, and
/// lists as a JSON array of strings (`["A","C"]`).
///
/// # Errors
///
/// Returns `AnswerShapeError` for `null`, objects, and lists containing
/// anything other than scalars.
pub fn normalize_answer(value: &Value) -> Result<String, AnswerShapeError> {
    match value {
        Value::Null => Err(AnswerShapeError::Null),
        Value::String(s) => Ok(s.clone()),
        Value::Number(_) | Value::Bool(_) => Ok(value.to_string()),
        Value::Array(items) => {
            let values = items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(Value::String(s.clone())),
                    Value::Number(_) | Value::Bool(_) => Ok(Value::String(item.to_string())),
                    _ => Err(AnswerShapeError::NonScalarItem),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(values).to_string())
        }
        Value::Object(_) => Err(AnswerShapeError::Unsupported),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn input(value: Value) -> QuestionInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn valid_text_question() {
        let q = validate_question(&input(json!({
            "type": "text",
            "question": "  Your name?  ",
            "description": null,
            "data": []
        })))
        .unwrap();

        assert_eq!(
            q,
            ValidQuestion {
                question_type: QuestionType::Text,
                question: "Your name?".into(),
                description: None,
                data: Some("[]".into()),
            }
        );
    }

    #[test]
    fn structured_data_is_serialized_canonically() {
        let q = validate_question(&input(json!({
            "type": "radio",
            "question": "Pick one",
            "data": { "options": ["A", "B"] }
        })))
        .unwrap();
        assert_eq!(q.data.as_deref(), Some(r#"{"options":["A","B"]}"#));
    }

    #[test]
    fn string_data_is_kept_verbatim() {
        let q = validate_question(&input(json!({
            "type": "select",
            "question": "Pick",
            "data": "[\"x\"]"
        })))
        .unwrap();
        assert_eq!(q.data.as_deref(), Some("[\"x\"]"));
    }

    #[test]
    fn explicit_null_data_is_present() {
        let q = validate_question(&input(json!({
            "type": "textarea",
            "question": "Comments",
            "data": null
        })))
        .unwrap();
        assert_eq!(q.data, None);
    }

    #[rstest]
    #[case::missing_type(json!({"question": "Q", "data": []}), QuestionValidationError::MissingField("type"))]
    #[case::unknown_type(json!({"type": "dropdown", "question": "Q", "data": []}), QuestionValidationError::InvalidQuestionType("dropdown".into()))]
    #[case::missing_label(json!({"type": "text", "data": []}), QuestionValidationError::MissingField("question"))]
    #[case::blank_label(json!({"type": "text", "question": "   ", "data": []}), QuestionValidationError::EmptyLabel)]
    #[case::missing_data(json!({"type": "text", "question": "Q"}), QuestionValidationError::MissingField("data"))]
    fn invalid_questions(#[case] raw: Value, #[case] expected: QuestionValidationError) {
        let err = validate_question(&input(raw)).unwrap_err();
        assert_eq!(err, expected);
    }

    #[test]
    fn error_reports_field() {
        assert_eq!(
            QuestionValidationError::InvalidQuestionType("x".into()).field(),
            "type"
        );
        assert_eq!(QuestionValidationError::EmptyLabel.field(), "question");
        assert_eq!(QuestionValidationError::MissingField("data").field(), "data");
    }

    #[rstest]
    #[case(json!(null), None)]
    #[case(json!(""), None)]
    #[case(json!("qst-1"), Some("qst-1"))]
    #[case(json!(42), Some("42"))]
    fn ids_accept_strings_and_numbers(#[case] id: Value, #[case] expected: Option<&str>) {
        let q = input(json!({ "id": id, "type": "text", "question": "Q", "data": [] }));
        assert_eq!(q.id.as_deref(), expected);
    }

    #[test]
    fn object_id_is_rejected() {
        let parsed = serde_json::from_value::<QuestionInput>(json!({ "id": {"a": 1} }));
        assert!(parsed.is_err());
    }

    #[rstest]
    #[case(json!("hello"), "hello")]
    #[case(json!(["A", "C"]), r#"["A","C"]"#)]
    #[case(json!([1, true, "x"]), r#"["1","true","x"]"#)]
    #[case(json!(5), "5")]
    #[case(json!(false), "false")]
    #[case(json!([]), "[]")]
    fn answers_normalize(#[case] value: Value, #[case] stored: &str) {
        assert_eq!(normalize_answer(&value).unwrap(), stored);
    }

    #[rstest]
    #[case(json!(null), AnswerShapeError::Null)]
    #[case(json!({"a": 1}), AnswerShapeError::Unsupported)]
    #[case(json!(["A", ["B"]]), AnswerShapeError::NonScalarItem)]
    #[case(json!([null]), AnswerShapeError::NonScalarItem)]
    fn bad_answers_rejected(#[case] value: Value, #[case] expected: AnswerShapeError) {
        assert_eq!(normalize_answer(&value).unwrap_err(), expected);
    }

    #[test]
    fn submission_builder_sorts_keys() {
        let submission = AnswerSubmission::new()
            .answer("qst-b", "x")
            .answer("qst-a", json!(["y"]));
        let keys: Vec<_> = submission.answers.keys().cloned().collect();
        assert_eq!(keys, vec!["qst-a", "qst-b"]);
        assert!(!submission.is_empty());
    }
}
