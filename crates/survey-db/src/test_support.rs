//! Shared test utilities for survey-db unit tests.

use survey_core::enums::{QuestionType, SurveyStatus};
use survey_core::validate::QuestionInput;

use crate::service::SurveyService;
use crate::updates::survey::NewSurvey;

/// Owner id used by most tests.
pub const OWNER: &str = "user-owner";

/// In-memory service with default settings.
pub async fn test_service() -> SurveyService {
    SurveyService::in_memory().await.unwrap()
}

/// A published survey with one text and one radio question.
pub async fn published_survey(svc: &SurveyService, title: &str) -> survey_core::entities::Survey {
    svc.create_survey(
        OWNER,
        NewSurvey::new(title)
            .status(SurveyStatus::Published)
            .question(QuestionInput::new(QuestionType::Text, "Name"))
            .question(
                QuestionInput::new(QuestionType::Radio, "Pick one")
                    .with_data(serde_json::json!(["A", "B"])),
            ),
    )
    .await
    .unwrap()
}
