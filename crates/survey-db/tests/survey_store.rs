//! Survey store integration tests: create, reconcile-update, delete, reads,
//! and the image lifecycle against the blob store.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;

use survey_core::enums::{QuestionType, SurveyStatus};
use survey_core::errors::ImageFormatError;
use survey_core::validate::{AnswerSubmission, QuestionInput};
use survey_db::error::SurveyError;
use survey_db::service::SurveyService;
use survey_db::updates::survey::{NewSurvey, SurveyPatch, SurveyPatchBuilder};

const OWNER: &str = "user-owner";
const STRANGER: &str = "user-stranger";

async fn test_service() -> SurveyService {
    SurveyService::in_memory().await.unwrap()
}

async fn count_rows(svc: &SurveyService, sql: &str) -> i64 {
    let mut rows = svc.db().conn().query(sql, ()).await.unwrap();
    rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap()
}

fn png_data_uri() -> String {
    format!(
        "data:image/png;base64,{}",
        STANDARD.encode(b"\x89PNG\r\n\x1a\nfake-image-bytes")
    )
}

fn text(label: &str) -> QuestionInput {
    QuestionInput::new(QuestionType::Text, label)
}

fn radio(label: &str, options: &[&str]) -> QuestionInput {
    QuestionInput::new(QuestionType::Radio, label).with_data(json!(options))
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_read_back_keeps_order() {
    let svc = test_service().await;
    let input = NewSurvey::new("Onboarding feedback")
        .description("How was your first week?")
        .question(text("Your team"))
        .question(QuestionInput::new(QuestionType::Textarea, "Anything else?"))
        .question(QuestionInput::new(QuestionType::Select, "Office").with_data(json!(["HQ", "Remote"])))
        .question(radio("Buddy assigned?", &["Yes", "No"]))
        .question(
            QuestionInput::new(QuestionType::Checkbox, "Tools received")
                .with_data(json!({"options": ["Laptop", "Badge"]})),
        );

    let created = svc.create_survey(OWNER, input).await.unwrap();
    let fetched = svc.get_survey(&created.id, OWNER).await.unwrap();

    let shape: Vec<(QuestionType, &str)> = fetched
        .questions
        .iter()
        .map(|q| (q.question_type, q.question.as_str()))
        .collect();
    assert_eq!(
        shape,
        vec![
            (QuestionType::Text, "Your team"),
            (QuestionType::Textarea, "Anything else?"),
            (QuestionType::Select, "Office"),
            (QuestionType::Radio, "Buddy assigned?"),
            (QuestionType::Checkbox, "Tools received"),
        ]
    );
    assert_eq!(fetched.questions[2].data.as_deref(), Some(r#"["HQ","Remote"]"#));
    assert_eq!(fetched.questions[4].config().options(), ["Laptop", "Badge"]);
    assert!(fetched.questions.iter().all(|q| q.survey_id == created.id));
    assert_eq!(fetched.description.as_deref(), Some("How was your first week?"));
    assert_eq!(fetched.status, SurveyStatus::Draft);
}

#[tokio::test]
async fn create_with_invalid_image_writes_nothing() {
    let svc = test_service().await;
    let err = svc
        .create_survey(
            OWNER,
            NewSurvey::new("With picture")
                .image("not-a-data-uri")
                .question(text("Q")),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SurveyError::InvalidImageFormat(ImageFormatError::NotDataUri)
    ));
    assert_eq!(err.status_code(), 400);
    assert_eq!(count_rows(&svc, "SELECT COUNT(*) FROM surveys").await, 0);
    assert_eq!(count_rows(&svc, "SELECT COUNT(*) FROM questions").await, 0);
}

#[tokio::test]
async fn create_with_unsupported_image_type() {
    let svc = test_service().await;
    let uri = format!("data:image/svg;base64,{}", STANDARD.encode(b"<svg/>"));
    let err = svc
        .create_survey(OWNER, NewSurvey::new("Vector").image(uri))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SurveyError::InvalidImageFormat(ImageFormatError::UnsupportedType(ref t)) if t == "svg"
    ));
}

#[tokio::test]
async fn create_with_image_saves_blob() {
    let svc = test_service().await;
    let survey = svc
        .create_survey(OWNER, NewSurvey::new("Pictured").image(png_data_uri()))
        .await
        .unwrap();

    assert!(survey.image.starts_with("images/"), "{}", survey.image);
    assert!(survey.image.ends_with(".png"), "{}", survey.image);
    assert!(svc.blob().exists(&survey.image).await.unwrap());
    assert_eq!(
        svc.blob().read(&survey.image).await.unwrap(),
        b"\x89PNG\r\n\x1a\nfake-image-bytes".to_vec()
    );
}

// ---------------------------------------------------------------------------
// Update / reconcile
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reconcile_scenario_delete_update_create() {
    let svc = test_service().await;
    let survey = svc
        .create_survey(
            OWNER,
            NewSurvey::new("Scenario")
                .question(text("First"))
                .question(radio("Second", &["A", "B"])),
        )
        .await
        .unwrap();
    let first = survey.questions[0].id.clone();
    let second = survey.questions[1].id.clone();

    let updated = svc
        .update_survey(
            &survey.id,
            OWNER,
            SurveyPatchBuilder::new()
                .questions(vec![
                    radio("Second", &["A", "B", "C"]).with_id(second.clone()),
                    text("New Q"),
                ])
                .build(),
        )
        .await
        .unwrap();

    assert_eq!(updated.questions.len(), 2);
    assert!(updated.questions.iter().all(|q| q.id != first));

    let kept = updated.questions.iter().find(|q| q.id == second).unwrap();
    assert_eq!(kept.config().options(), ["A", "B", "C"]);

    let fresh = updated.questions.iter().find(|q| q.id != second).unwrap();
    assert_eq!(fresh.question, "New Q");
    assert_eq!(fresh.question_type, QuestionType::Text);
}

#[tokio::test]
async fn reconcile_keeps_answers_of_surviving_questions_only() {
    let svc = test_service().await;
    let survey = svc
        .create_survey(
            OWNER,
            NewSurvey::new("Answered")
                .status(SurveyStatus::Published)
                .question(text("Dropped"))
                .question(text("Kept")),
        )
        .await
        .unwrap();
    let dropped = survey.questions[0].id.clone();
    let kept = survey.questions[1].id.clone();

    svc.submit_answers(
        &survey.id,
        &AnswerSubmission::new()
            .answer(dropped.as_str(), "bye")
            .answer(kept.as_str(), "stay"),
    )
    .await
    .unwrap();

    let updated = svc
        .update_survey(
            &survey.id,
            OWNER,
            SurveyPatchBuilder::new()
                .questions(vec![text("Kept, reworded").with_id(kept.clone()), text("Added")])
                .build(),
        )
        .await
        .unwrap();

    let ids = updated.question_ids();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0], kept);
    assert_ne!(ids[1], dropped);

    let orphaned = count_rows(
        &svc,
        &format!("SELECT COUNT(*) FROM question_answers WHERE question_id = '{dropped}'"),
    )
    .await;
    assert_eq!(orphaned, 0);
    let surviving = count_rows(
        &svc,
        &format!("SELECT COUNT(*) FROM question_answers WHERE question_id = '{kept}'"),
    )
    .await;
    assert_eq!(surviving, 1);
}

#[tokio::test]
async fn repeated_identical_update_is_stable() {
    let svc = test_service().await;
    let survey = svc
        .create_survey(
            OWNER,
            NewSurvey::new("Idempotent")
                .question(text("One"))
                .question(radio("Two", &["x", "y"])),
        )
        .await
        .unwrap();

    let list: Vec<QuestionInput> = survey
        .questions
        .iter()
        .map(|q| {
            QuestionInput::new(q.question_type, q.question.clone())
                .with_id(q.id.clone())
                .with_data(serde_json::from_str(q.data.as_deref().unwrap_or("null")).unwrap())
        })
        .collect();

    let once = svc
        .update_survey(
            &survey.id,
            OWNER,
            SurveyPatchBuilder::new().questions(list.clone()).build(),
        )
        .await
        .unwrap();
    let twice = svc
        .update_survey(
            &survey.id,
            OWNER,
            SurveyPatchBuilder::new().questions(list).build(),
        )
        .await
        .unwrap();

    assert_eq!(once.question_ids(), survey.question_ids());
    assert_eq!(twice.question_ids(), survey.question_ids());
    assert_eq!(twice.questions[1].data, survey.questions[1].data);
}

#[tokio::test]
async fn empty_question_list_deletes_all() {
    let svc = test_service().await;
    let survey = svc
        .create_survey(OWNER, NewSurvey::new("Wipe").question(text("a")).question(text("b")))
        .await
        .unwrap();
    let updated = svc
        .update_survey(&survey.id, OWNER, SurveyPatchBuilder::new().questions(vec![]).build())
        .await
        .unwrap();
    assert!(updated.questions.is_empty());
    assert_eq!(count_rows(&svc, "SELECT COUNT(*) FROM questions").await, 0);
}

#[tokio::test]
async fn invalid_question_aborts_update_without_changes() {
    let svc = test_service().await;
    let survey = svc
        .create_survey(OWNER, NewSurvey::new("Guarded").question(text("Original")))
        .await
        .unwrap();

    let bad = QuestionInput {
        question_type: Some("radio".into()),
        question: Some("No data".into()),
        ..QuestionInput::default()
    };
    let err = svc
        .update_survey(
            &survey.id,
            OWNER,
            SurveyPatchBuilder::new()
                .title("Should not stick")
                .questions(vec![text("Fresh"), bad])
                .build(),
        )
        .await
        .unwrap_err();

    match err {
        SurveyError::ValidationFailed { field, .. } => assert_eq!(field, "questions.1.data"),
        other => panic!("unexpected {other:?}"),
    }
    let unchanged = svc.get_survey(&survey.id, OWNER).await.unwrap();
    assert_eq!(unchanged, survey);
}

#[tokio::test]
async fn unknown_incoming_id_is_created() {
    let svc = test_service().await;
    let survey = svc
        .create_survey(OWNER, NewSurvey::new("Ids").question(text("a")))
        .await
        .unwrap();
    let updated = svc
        .update_survey(
            &survey.id,
            OWNER,
            SurveyPatchBuilder::new()
                .questions(vec![
                    text("a").with_id(survey.questions[0].id.clone()),
                    text("b").with_id("qst-ffffffff"),
                ])
                .build(),
        )
        .await
        .unwrap();
    assert_eq!(updated.questions.len(), 2);
    assert_ne!(updated.questions[1].id, "qst-ffffffff");
}

#[tokio::test]
async fn update_and_delete_require_owner() {
    let svc = test_service().await;
    let survey = svc
        .create_survey(OWNER, NewSurvey::new("Mine").question(text("a")))
        .await
        .unwrap();

    let err = svc
        .update_survey(
            &survey.id,
            STRANGER,
            SurveyPatchBuilder::new().title("Hijacked").build(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SurveyError::Unauthorized { .. }));
    assert_eq!(err.status_code(), 403);

    let err = svc.delete_survey(&survey.id, STRANGER).await.unwrap_err();
    assert!(matches!(err, SurveyError::Unauthorized { .. }));
    assert_eq!(svc.get_survey(&survey.id, OWNER).await.unwrap().title, "Mine");
}

#[tokio::test]
async fn update_missing_survey_is_not_found() {
    let svc = test_service().await;
    let err = svc
        .update_survey("svy-00000000", OWNER, SurveyPatchBuilder::new().build())
        .await
        .unwrap_err();
    assert!(matches!(err, SurveyError::NotFound { .. }));
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn json_patch_nulls_clear_description_and_expiry() {
    let svc = test_service().await;
    let survey = svc
        .create_survey(
            OWNER,
            NewSurvey::new("Quarterly pulse")
                .description("Runs every quarter")
                .expire_date(Utc::now() + Duration::days(30)),
        )
        .await
        .unwrap();
    assert!(survey.description.is_some());
    assert!(survey.expire_date.is_some());

    let patch: SurveyPatch =
        serde_json::from_str(r#"{"expire_date": null, "description": null}"#).unwrap();
    let updated = svc.update_survey(&survey.id, OWNER, patch).await.unwrap();

    assert_eq!(updated.description, None);
    assert_eq!(updated.expire_date, None);
    assert_eq!(updated.title, "Quarterly pulse");

    let untouched: SurveyPatch = serde_json::from_str(r#"{"title": "Pulse"}"#).unwrap();
    let renamed = svc.update_survey(&survey.id, OWNER, untouched).await.unwrap();
    assert_eq!(renamed.title, "Pulse");
    assert_eq!(renamed.description, None);
}

#[tokio::test]
async fn json_patch_without_nullable_keys_keeps_them() {
    let svc = test_service().await;
    let expiry = Utc::now() + Duration::days(7);
    let survey = svc
        .create_survey(
            OWNER,
            NewSurvey::new("Kept").description("Stays").expire_date(expiry),
        )
        .await
        .unwrap();

    let patch: SurveyPatch = serde_json::from_str(r#"{"status": "published"}"#).unwrap();
    let updated = svc.update_survey(&survey.id, OWNER, patch).await.unwrap();

    assert_eq!(updated.status, SurveyStatus::Published);
    assert_eq!(updated.description.as_deref(), Some("Stays"));
    assert_eq!(updated.expire_date, survey.expire_date);
}

#[tokio::test]
async fn replacing_image_deletes_previous_after_commit() {
    let svc = test_service().await;
    let survey = svc
        .create_survey(OWNER, NewSurvey::new("Pictured").image(png_data_uri()))
        .await
        .unwrap();
    let old_image = survey.image.clone();

    let updated = svc
        .update_survey(
            &survey.id,
            OWNER,
            SurveyPatchBuilder::new().image(png_data_uri()).build(),
        )
        .await
        .unwrap();

    assert_ne!(updated.image, old_image);
    assert!(svc.blob().exists(&updated.image).await.unwrap());
    assert!(!svc.blob().exists(&old_image).await.unwrap());
}

#[tokio::test]
async fn update_without_image_keeps_current_image() {
    let svc = test_service().await;
    let survey = svc
        .create_survey(OWNER, NewSurvey::new("Pictured").image(png_data_uri()))
        .await
        .unwrap();
    let updated = svc
        .update_survey(&survey.id, OWNER, SurveyPatchBuilder::new().title("Retitled").build())
        .await
        .unwrap();
    assert_eq!(updated.image, survey.image);
    assert!(svc.blob().exists(&survey.image).await.unwrap());
}

#[tokio::test]
async fn invalid_image_on_update_changes_nothing() {
    let svc = test_service().await;
    let survey = svc
        .create_survey(OWNER, NewSurvey::new("Plain"))
        .await
        .unwrap();
    let err = svc
        .update_survey(
            &survey.id,
            OWNER,
            SurveyPatchBuilder::new()
                .title("Changed")
                .image("data:image/png;base64,@@@")
                .build(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SurveyError::InvalidImageFormat(_)));
    assert_eq!(svc.get_survey(&survey.id, OWNER).await.unwrap().title, "Plain");
}

#[tokio::test]
async fn failed_removal_of_replaced_image_still_commits_update() {
    let svc = test_service().await;
    let survey = svc
        .create_survey(OWNER, NewSurvey::new("Broken picture"))
        .await
        .unwrap();
    svc.db()
        .conn()
        .execute(
            "UPDATE surveys SET image = 'images/../broken.png' WHERE id = ?1",
            [survey.id.as_str()],
        )
        .await
        .unwrap();

    let updated = svc
        .update_survey(
            &survey.id,
            OWNER,
            SurveyPatchBuilder::new().image(png_data_uri()).build(),
        )
        .await
        .unwrap();

    assert_ne!(updated.image, "images/../broken.png");
    assert!(svc.blob().exists(&updated.image).await.unwrap());
    let stored = svc.get_survey(&survey.id, OWNER).await.unwrap();
    assert_eq!(stored.image, updated.image);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_cascades_and_removes_image() {
    let svc = test_service().await;
    let survey = svc
        .create_survey(
            OWNER,
            NewSurvey::new("Doomed")
                .status(SurveyStatus::Published)
                .image(png_data_uri())
                .question(text("a")),
        )
        .await
        .unwrap();
    svc.submit_answers(
        &survey.id,
        &AnswerSubmission::new().answer(survey.questions[0].id.as_str(), "x"),
    )
    .await
    .unwrap();

    svc.delete_survey(&survey.id, OWNER).await.unwrap();

    for table in ["surveys", "questions", "answer_sessions", "question_answers"] {
        assert_eq!(
            count_rows(&svc, &format!("SELECT COUNT(*) FROM {table}")).await,
            0,
            "{table} should be empty"
        );
    }
    assert!(!svc.blob().exists(&survey.image).await.unwrap());
    assert!(matches!(
        svc.get_survey(&survey.id, OWNER).await.unwrap_err(),
        SurveyError::NotFound { .. }
    ));
}

#[tokio::test]
async fn delete_with_default_image_leaves_default_alone() {
    let svc = test_service().await;
    let survey = svc
        .create_survey(OWNER, NewSurvey::new("No picture"))
        .await
        .unwrap();
    assert_eq!(survey.image, svc.settings().default_image);
    svc.delete_survey(&survey.id, OWNER).await.unwrap();
}

#[tokio::test]
async fn failed_image_removal_still_deletes_survey() {
    let svc = test_service().await;
    let survey = svc
        .create_survey(OWNER, NewSurvey::new("Gone anyway").question(text("a")))
        .await
        .unwrap();
    svc.db()
        .conn()
        .execute(
            "UPDATE surveys SET image = 'images/../broken.png' WHERE id = ?1",
            [survey.id.as_str()],
        )
        .await
        .unwrap();

    svc.delete_survey(&survey.id, OWNER).await.unwrap();

    assert_eq!(count_rows(&svc, "SELECT COUNT(*) FROM surveys").await, 0);
    assert_eq!(count_rows(&svc, "SELECT COUNT(*) FROM questions").await, 0);
}

// ---------------------------------------------------------------------------
// Guest reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn guest_sees_published_survey_by_slug() {
    let svc = test_service().await;
    let survey = svc
        .create_survey(
            OWNER,
            NewSurvey::new("Open House")
                .status(SurveyStatus::Published)
                .question(text("Name")),
        )
        .await
        .unwrap();
    let seen = svc.get_survey_by_slug("open-house").await.unwrap();
    assert_eq!(seen, survey);
}

#[tokio::test]
async fn guest_cannot_see_draft_or_expired() {
    let svc = test_service().await;
    svc.create_survey(OWNER, NewSurvey::new("Draft only"))
        .await
        .unwrap();
    let err = svc.get_survey_by_slug("draft-only").await.unwrap_err();
    assert!(matches!(err, SurveyError::Forbidden { .. }));

    let expire = Utc::now() + Duration::days(1);
    svc.create_survey(
        OWNER,
        NewSurvey::new("Closing soon")
            .status(SurveyStatus::Published)
            .expire_date(expire),
    )
    .await
    .unwrap();
    assert!(svc.get_survey_by_slug("closing-soon").await.is_ok());
    let err = svc
        .get_survey_by_slug_at("closing-soon", expire + Duration::seconds(1))
        .await
        .unwrap_err();
    assert!(matches!(err, SurveyError::Forbidden { .. }));

    let err = svc.get_survey_by_slug("no-such-survey").await.unwrap_err();
    assert!(matches!(err, SurveyError::NotFound { .. }));
}
