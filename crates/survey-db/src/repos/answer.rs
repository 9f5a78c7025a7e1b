//! Answer collector: atomic answer submission and owner-side answer reads.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use survey_core::aggregate::tally_answers;
use survey_core::entities::{AnswerSession, QuestionAnswer};
use survey_core::ids::{PREFIX_ANSWER_SESSION, PREFIX_QUESTION_ANSWER};
use survey_core::responses::QuestionAnswerSummary;
use survey_core::validate::{AnswerSubmission, normalize_answer};

use crate::error::{DatabaseError, SurveyError};
use crate::generate_id_on;
use crate::helpers::{format_timestamp, now, parse_datetime};
use crate::repos::question::{answers_for_question, load_questions, question_ids};
use crate::repos::survey::find_survey_row;
use crate::service::SurveyService;

const SESSION_COLS: &str = "id, survey_id, start_date, end_date";
const ANSWER_COLS: &str = "id, question_id, answer_session_id, answer";

fn row_to_session(row: &libsql::Row) -> Result<AnswerSession, DatabaseError> {
    Ok(AnswerSession {
        id: row.get(0)?,
        survey_id: row.get(1)?,
        start_date: parse_datetime(&row.get::<String>(2)?)?,
        end_date: parse_datetime(&row.get::<String>(3)?)?,
    })
}

fn row_to_answer(row: &libsql::Row) -> Result<QuestionAnswer, DatabaseError> {
    Ok(QuestionAnswer {
        id: row.get(0)?,
        question_id: row.get(1)?,
        answer_session_id: row.get(2)?,
        answer: row.get(3)?,
    })
}

/// Check every answer against the live question set and normalize values.
///
/// Question ids are checked before any value, so the reported reference
/// error is the first unknown id in sorted order.
fn prepare_answers(
    live_ids: &HashSet<String>,
    submission: &AnswerSubmission,
) -> Result<Vec<(String, String)>, SurveyError> {
    if submission.is_empty() {
        return Err(SurveyError::ValidationFailed {
            field: "answers".into(),
            message: "at least one answer is required".into(),
        });
    }
    if let Some(unknown) = submission.answers.keys().find(|id| !live_ids.contains(*id)) {
        return Err(SurveyError::InvalidQuestionReference(unknown.clone()));
    }
    submission
        .answers
        .iter()
        .map(|(question_id, value)| {
            normalize_answer(value)
                .map(|text| (question_id.clone(), text))
                .map_err(|e| SurveyError::ValidationFailed {
                    field: format!("answers.{question_id}"),
                    message: e.to_string(),
                })
        })
        .collect()
}

impl SurveyService {
    /// Record one respondent's answers to a survey, timestamped now.
    ///
    /// # Errors
    ///
    /// See [`Self::submit_answers_at`].
    pub async fn submit_answers(
        &self,
        survey_id: &str,
        submission: &AnswerSubmission,
    ) -> Result<AnswerSession, SurveyError> {
        self.submit_answers_at(survey_id, submission, now()).await
    }

    /// Record one respondent's answers with an explicit submission time.
    ///
    /// The session and all its answers commit together or not at all.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown survey, `Forbidden` if the survey is a
    /// draft or expired at `at`, `ValidationFailed` for an empty submission
    /// or an unsupported value, `InvalidQuestionReference` for an id outside
    /// the survey's live questions.
    pub async fn submit_answers_at(
        &self,
        survey_id: &str,
        submission: &AnswerSubmission,
        at: DateTime<Utc>,
    ) -> Result<AnswerSession, SurveyError> {
        let _guard = self.write_gate().await;
        let conn = self.db().conn();

        let survey = find_survey_row(conn, survey_id)
            .await?
            .ok_or_else(|| SurveyError::survey_not_found(survey_id))?;
        if !survey.is_open_at(at) {
            return Err(SurveyError::Forbidden {
                survey_id: survey_id.to_string(),
            });
        }

        let live_ids: HashSet<String> = question_ids(conn, survey_id).await?.into_iter().collect();
        let answers = prepare_answers(&live_ids, submission)?;

        let tx = conn.transaction().await?;
        let result = async {
            let session_id = generate_id_on(&tx, PREFIX_ANSWER_SESSION).await?;
            let stamp = format_timestamp(at);
            tx.execute(
                &format!("INSERT INTO answer_sessions ({SESSION_COLS}) VALUES (?1, ?2, ?3, ?4)"),
                libsql::params![session_id.as_str(), survey_id, stamp.as_str(), stamp.as_str()],
            )
            .await?;

            for (question_id, answer) in &answers {
                let id = generate_id_on(&tx, PREFIX_QUESTION_ANSWER).await?;
                tx.execute(
                    &format!("INSERT INTO question_answers ({ANSWER_COLS}) VALUES (?1, ?2, ?3, ?4)"),
                    libsql::params![
                        id.as_str(),
                        question_id.as_str(),
                        session_id.as_str(),
                        answer.as_str()
                    ],
                )
                .await?;
            }

            Ok::<_, SurveyError>(AnswerSession {
                id: session_id,
                survey_id: survey_id.to_string(),
                start_date: at,
                end_date: at,
            })
        }
        .await;

        let session = Self::finish(tx, result).await?;
        tracing::info!(
            survey_id,
            session_id = %session.id,
            answers = answers.len(),
            "recorded answer session"
        );
        Ok(session)
    }

    /// The answers recorded in one session, for the owner of its survey.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown session, `Unauthorized` if `caller_id`
    /// does not own the survey.
    pub async fn session_answers(
        &self,
        session_id: &str,
        caller_id: &str,
    ) -> Result<(AnswerSession, Vec<QuestionAnswer>), SurveyError> {
        let _guard = self.read_gate().await;
        let conn = self.db().conn();

        let mut rows = conn
            .query(
                &format!("SELECT {SESSION_COLS} FROM answer_sessions WHERE id = ?1"),
                [session_id],
            )
            .await?;
        let session = match rows.next().await? {
            Some(row) => row_to_session(&row)?,
            None => {
                return Err(SurveyError::NotFound {
                    entity: "answer session",
                    id: session_id.to_string(),
                });
            }
        };

        let survey = find_survey_row(conn, &session.survey_id)
            .await?
            .ok_or_else(|| SurveyError::survey_not_found(&session.survey_id))?;
        if !survey.is_owned_by(caller_id) {
            return Err(SurveyError::Unauthorized {
                survey_id: survey.id,
            });
        }

        let mut rows = conn
            .query(
                &format!(
                    "SELECT {ANSWER_COLS} FROM question_answers
                     WHERE answer_session_id = ?1 ORDER BY rowid"
                ),
                [session_id],
            )
            .await?;
        let mut answers = Vec::new();
        while let Some(row) = rows.next().await? {
            answers.push(row_to_answer(&row)?);
        }
        Ok((session, answers))
    }

    /// Per-question answer tallies for the owner of a survey.
    ///
    /// Questions appear in stored order; only live questions are reported.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Unauthorized` if `caller_id` is not the owner.
    pub async fn answers_by_question(
        &self,
        survey_id: &str,
        caller_id: &str,
    ) -> Result<Vec<QuestionAnswerSummary>, SurveyError> {
        let _guard = self.read_gate().await;
        let conn = self.db().conn();

        let survey = find_survey_row(conn, survey_id)
            .await?
            .ok_or_else(|| SurveyError::survey_not_found(survey_id))?;
        if !survey.is_owned_by(caller_id) {
            return Err(SurveyError::Unauthorized {
                survey_id: survey_id.to_string(),
            });
        }

        let mut summaries = Vec::new();
        for question in load_questions(conn, survey_id).await? {
            let answers = answers_for_question(conn, &question.id).await?;
            summaries.push(tally_answers(&question, &answers));
        }
        Ok(summaries)
    }
}
