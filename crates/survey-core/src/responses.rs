//! Read models returned by the dashboard and answer aggregation queries.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{QuestionType, SurveyStatus};

/// Compact survey view for the dashboard's "latest survey" card.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SurveySummary {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub status: SurveyStatus,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub expire_date: Option<DateTime<Utc>>,
    pub question_count: u64,
    pub answer_count: u64,
}

/// One answer session joined with its survey's title.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AnswerLogEntry {
    pub id: String,
    pub survey_id: String,
    pub survey_title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Everything the dashboard landing view shows, in one read.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_surveys: u64,
    pub latest_survey: Option<SurveySummary>,
    pub total_answers: u64,
    pub latest_answers: Vec<AnswerLogEntry>,
}

/// How many times one value was given for a question.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AnswerTally {
    pub value: String,
    pub count: u64,
}

/// Aggregated answers for one question.
///
/// `tallies` lists every configured option first (in option order, possibly
/// with a zero count), then any other values given, most frequent first.
/// Multi-value answers contribute one count per selected option.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QuestionAnswerSummary {
    pub question_id: String,
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Number of sessions that answered this question.
    pub total_answers: u64,
    pub tallies: Vec<AnswerTally>,
}
