//! Question rows and application of reconcile plans.
//!
//! These are free functions over a connection so they run unchanged inside
//! an open transaction.

use chrono::{DateTime, Utc};
use survey_core::entities::Question;
use survey_core::ids::PREFIX_QUESTION;
use survey_core::reconcile::{QuestionChange, ReconcilePlan};
use survey_core::validate::ValidQuestion;

use crate::error::DatabaseError;
use crate::generate_id_on;
use crate::helpers::{format_timestamp, get_opt_string, parse_datetime, parse_enum};

const SELECT_COLS: &str = "id, survey_id, type, question, description, data, created_at, updated_at";

fn row_to_question(row: &libsql::Row) -> Result<Question, DatabaseError> {
    Ok(Question {
        id: row.get(0)?,
        survey_id: row.get(1)?,
        question_type: parse_enum(&row.get::<String>(2)?)?,
        question: row.get(3)?,
        description: get_opt_string(row, 4)?,
        data: row.get::<Option<String>>(5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

/// A survey's questions in insertion order.
pub(crate) async fn load_questions(
    conn: &libsql::Connection,
    survey_id: &str,
) -> Result<Vec<Question>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM questions WHERE survey_id = ?1 ORDER BY rowid"),
            [survey_id],
        )
        .await?;
    let mut questions = Vec::new();
    while let Some(row) = rows.next().await? {
        questions.push(row_to_question(&row)?);
    }
    Ok(questions)
}

/// Ids of a survey's live questions, in insertion order.
pub(crate) async fn question_ids(
    conn: &libsql::Connection,
    survey_id: &str,
) -> Result<Vec<String>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT id FROM questions WHERE survey_id = ?1 ORDER BY rowid",
            [survey_id],
        )
        .await?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next().await? {
        ids.push(row.get::<String>(0)?);
    }
    Ok(ids)
}

async fn insert_question(
    conn: &libsql::Connection,
    survey_id: &str,
    question: &ValidQuestion,
    now: DateTime<Utc>,
) -> Result<String, DatabaseError> {
    let id = generate_id_on(conn, PREFIX_QUESTION).await?;
    conn.execute(
        &format!("INSERT INTO questions ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
        libsql::params![
            id.as_str(),
            survey_id,
            question.question_type.as_str(),
            question.question.as_str(),
            question.description.as_deref(),
            question.data.as_deref(),
            format_timestamp(now),
            format_timestamp(now)
        ],
    )
    .await?;
    Ok(id)
}

async fn update_question(
    conn: &libsql::Connection,
    survey_id: &str,
    change: &QuestionChange,
    now: DateTime<Utc>,
) -> Result<(), DatabaseError> {
    let question = &change.question;
    let affected = conn
        .execute(
            "UPDATE questions
             SET type = ?1, question = ?2, description = ?3, data = ?4, updated_at = ?5
             WHERE id = ?6 AND survey_id = ?7",
            libsql::params![
                question.question_type.as_str(),
                question.question.as_str(),
                question.description.as_deref(),
                question.data.as_deref(),
                format_timestamp(now),
                change.id.as_str(),
                survey_id
            ],
        )
        .await?;
    if affected == 0 {
        return Err(DatabaseError::InvalidState(format!(
            "question {} vanished from survey {survey_id}",
            change.id
        )));
    }
    Ok(())
}

/// Apply a reconcile plan: deletes, then creates, then updates.
///
/// Answers to deleted questions go with them via `ON DELETE CASCADE`.
/// Returns the ids of the created questions, in plan order.
pub(crate) async fn apply_plan(
    conn: &libsql::Connection,
    survey_id: &str,
    plan: &ReconcilePlan,
    now: DateTime<Utc>,
) -> Result<Vec<String>, DatabaseError> {
    for id in &plan.delete {
        conn.execute(
            "DELETE FROM questions WHERE id = ?1 AND survey_id = ?2",
            [id.as_str(), survey_id],
        )
        .await?;
    }

    let mut created = Vec::with_capacity(plan.create.len());
    for question in &plan.create {
        created.push(insert_question(conn, survey_id, question, now).await?);
    }

    for change in &plan.update {
        update_question(conn, survey_id, change, now).await?;
    }

    tracing::debug!(
        survey_id,
        deleted = plan.delete.len(),
        created = created.len(),
        updated = plan.update.len(),
        "applied question plan"
    );
    Ok(created)
}

/// Stored answer values for one question, oldest first.
pub(crate) async fn answers_for_question(
    conn: &libsql::Connection,
    question_id: &str,
) -> Result<Vec<String>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT answer FROM question_answers WHERE question_id = ?1 ORDER BY rowid",
            [question_id],
        )
        .await?;
    let mut answers = Vec::new();
    while let Some(row) = rows.next().await? {
        answers.push(row.get::<String>(0)?);
    }
    Ok(answers)
}
