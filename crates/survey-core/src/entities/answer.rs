use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One respondent's atomic submission to a survey.
///
/// `start_date` and `end_date` are both set at submission time.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AnswerSession {
    pub id: String,
    pub survey_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// One answer value for one question within a session.
///
/// Multi-value answers are stored as a JSON array of strings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QuestionAnswer {
    pub id: String,
    pub question_id: String,
    pub answer_session_id: String,
    pub answer: String,
}
