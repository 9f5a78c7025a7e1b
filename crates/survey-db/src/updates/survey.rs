//! Survey create input and update builder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use survey_core::enums::SurveyStatus;
use survey_core::validate::QuestionInput;

/// Everything needed to create a survey.
///
/// `image` is an optional `data:image/<type>;base64,...` URI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewSurvey {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: SurveyStatus,
    #[serde(default)]
    pub expire_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub questions: Vec<QuestionInput>,
}

impl NewSurvey {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn status(mut self, status: SurveyStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub const fn expire_date(mut self, expire_date: DateTime<Utc>) -> Self {
        self.expire_date = Some(expire_date);
        self
    }

    #[must_use]
    pub fn image(mut self, data_uri: impl Into<String>) -> Self {
        self.image = Some(data_uri.into());
        self
    }

    #[must_use]
    pub fn question(mut self, question: QuestionInput) -> Self {
        self.questions.push(question);
        self
    }
}

/// Changes to apply to a stored survey.
///
/// `questions: None` leaves the question list untouched; `Some(list)`
/// reconciles the stored questions against `list` (an empty list deletes
/// every question). `image: None` keeps the current image.
///
/// In JSON an absent `description`/`expire_date` leaves the field alone and
/// an explicit `null` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SurveyStatus>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub expire_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuestionInput>>,
}

// Only called for keys present in the input, so `null` becomes `Some(None)`.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub struct SurveyPatchBuilder(SurveyPatch);

impl SurveyPatchBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(SurveyPatch::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.0.description = Some(description);
        self
    }

    #[must_use]
    pub const fn status(mut self, status: SurveyStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub const fn expire_date(mut self, expire_date: Option<DateTime<Utc>>) -> Self {
        self.0.expire_date = Some(expire_date);
        self
    }

    #[must_use]
    pub fn image(mut self, data_uri: impl Into<String>) -> Self {
        self.0.image = Some(data_uri.into());
        self
    }

    #[must_use]
    pub fn questions(mut self, questions: Vec<QuestionInput>) -> Self {
        self.0.questions = Some(questions);
        self
    }

    #[must_use]
    pub fn build(self) -> SurveyPatch {
        self.0
    }
}

impl Default for SurveyPatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}
