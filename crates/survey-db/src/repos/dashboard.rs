//! Dashboard aggregator: owner-scoped counts, latest-N windows and logs.
//!
//! Every query joins answer sessions to their survey and filters on the
//! survey's owner. Sessions are ordered by `end_date` descending with
//! insertion order as the tie-break.

use survey_core::pagination::{Page, PageRequest};
use survey_core::responses::{AnswerLogEntry, DashboardSummary, SurveySummary};

use crate::error::{DatabaseError, SurveyError};
use crate::helpers::{get_count, parse_datetime};
use crate::repos::survey::{SUMMARY_SELECT, row_to_summary};
use crate::service::SurveyService;

const LOG_SELECT: &str = "SELECT a.id, a.survey_id, s.title, a.start_date, a.end_date
     FROM answer_sessions a
     JOIN surveys s ON s.id = a.survey_id
     WHERE s.owner_id = ?1
     ORDER BY a.end_date DESC, a.rowid DESC";

fn row_to_log_entry(row: &libsql::Row) -> Result<AnswerLogEntry, DatabaseError> {
    Ok(AnswerLogEntry {
        id: row.get(0)?,
        survey_id: row.get(1)?,
        survey_title: row.get(2)?,
        start_date: parse_datetime(&row.get::<String>(3)?)?,
        end_date: parse_datetime(&row.get::<String>(4)?)?,
    })
}

async fn count(conn: &libsql::Connection, sql: &str, owner_id: &str) -> Result<u64, DatabaseError> {
    let mut rows = conn.query(sql, [owner_id]).await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    get_count(&row, 0)
}

async fn count_surveys(conn: &libsql::Connection, owner_id: &str) -> Result<u64, DatabaseError> {
    count(conn, "SELECT COUNT(*) FROM surveys WHERE owner_id = ?1", owner_id).await
}

async fn count_answers(conn: &libsql::Connection, owner_id: &str) -> Result<u64, DatabaseError> {
    count(
        conn,
        "SELECT COUNT(*) FROM answer_sessions a
         JOIN surveys s ON s.id = a.survey_id
         WHERE s.owner_id = ?1",
        owner_id,
    )
    .await
}

async fn newest_survey(
    conn: &libsql::Connection,
    owner_id: &str,
) -> Result<Option<SurveySummary>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "{SUMMARY_SELECT}
                 WHERE s.owner_id = ?1
                 ORDER BY s.created_at DESC, s.rowid DESC
                 LIMIT 1"
            ),
            [owner_id],
        )
        .await?;
    rows.next().await?.map(|row| row_to_summary(&row)).transpose()
}

async fn log_window(
    conn: &libsql::Connection,
    owner_id: &str,
    limit: u32,
    offset: u64,
) -> Result<Vec<AnswerLogEntry>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("{LOG_SELECT} LIMIT ?2 OFFSET ?3"),
            libsql::params![
                owner_id,
                i64::from(limit),
                i64::try_from(offset).unwrap_or(i64::MAX)
            ],
        )
        .await?;
    let mut entries = Vec::new();
    while let Some(row) = rows.next().await? {
        entries.push(row_to_log_entry(&row)?);
    }
    Ok(entries)
}

impl SurveyService {
    /// Number of surveys `owner_id` owns.
    ///
    /// # Errors
    ///
    /// Storage errors only.
    pub async fn total_surveys(&self, owner_id: &str) -> Result<u64, SurveyError> {
        let _guard = self.read_gate().await;
        Ok(count_surveys(self.db().conn(), owner_id).await?)
    }

    /// The owner's most recently created survey.
    ///
    /// # Errors
    ///
    /// Storage errors only.
    pub async fn latest_survey(&self, owner_id: &str) -> Result<Option<SurveySummary>, SurveyError> {
        let _guard = self.read_gate().await;
        Ok(newest_survey(self.db().conn(), owner_id).await?)
    }

    /// Answer sessions across all of the owner's surveys.
    ///
    /// # Errors
    ///
    /// Storage errors only.
    pub async fn total_answers(&self, owner_id: &str) -> Result<u64, SurveyError> {
        let _guard = self.read_gate().await;
        Ok(count_answers(self.db().conn(), owner_id).await?)
    }

    /// The `limit` most recent answer sessions by end time.
    ///
    /// # Errors
    ///
    /// Storage errors only.
    pub async fn latest_answers(
        &self,
        owner_id: &str,
        limit: u32,
    ) -> Result<Vec<AnswerLogEntry>, SurveyError> {
        let _guard = self.read_gate().await;
        Ok(log_window(self.db().conn(), owner_id, limit, 0).await?)
    }

    /// Paginated answer log, newest first, with survey titles.
    ///
    /// # Errors
    ///
    /// Storage errors only.
    pub async fn logs(
        &self,
        owner_id: &str,
        page: PageRequest,
    ) -> Result<Page<AnswerLogEntry>, SurveyError> {
        let _guard = self.read_gate().await;
        let conn = self.db().conn();
        let total = count_answers(conn, owner_id).await?;
        let items = log_window(conn, owner_id, page.limit(), page.offset()).await?;
        tracing::debug!(owner_id, page = page.page, total, "read answer log");
        Ok(Page::new(items, page, total))
    }

    /// Everything the dashboard landing view shows, read under one gate.
    ///
    /// # Errors
    ///
    /// Storage errors only.
    pub async fn dashboard(&self, owner_id: &str) -> Result<DashboardSummary, SurveyError> {
        let _guard = self.read_gate().await;
        let conn = self.db().conn();
        Ok(DashboardSummary {
            total_surveys: count_surveys(conn, owner_id).await?,
            latest_survey: newest_survey(conn, owner_id).await?,
            total_answers: count_answers(conn, owner_id).await?,
            latest_answers: log_window(conn, owner_id, self.settings().latest_answers_limit, 0)
                .await?,
        })
    }
}
