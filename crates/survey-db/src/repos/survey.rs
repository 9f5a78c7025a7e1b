//! Survey repository: create, reconcile-update, delete, owner and guest reads.

use chrono::{DateTime, Utc};
use survey_core::entities::Survey;
use survey_core::enums::SurveyStatus;
use survey_core::ids::PREFIX_SURVEY;
use survey_core::image::ImagePayload;
use survey_core::pagination::{Page, PageRequest};
use survey_core::reconcile::reconcile;
use survey_core::responses::SurveySummary;
use survey_core::slug::{candidate, slugify};

use crate::error::{DatabaseError, SurveyError};
use crate::generate_id_on;
use crate::helpers::{
    format_timestamp, get_count, get_opt_string, now, parse_datetime, parse_optional_datetime,
};
use crate::repos::question::{apply_plan, load_questions, question_ids};
use crate::service::SurveyService;
use crate::updates::survey::{NewSurvey, SurveyPatch};

const SELECT_COLS: &str =
    "id, owner_id, title, slug, status, description, image, expire_date, created_at, updated_at";

/// Survey summary columns with question and answer-session counts.
pub(crate) const SUMMARY_SELECT: &str = "SELECT s.id, s.title, s.slug, s.status, s.image, s.created_at, s.expire_date,
        (SELECT COUNT(*) FROM questions q WHERE q.survey_id = s.id),
        (SELECT COUNT(*) FROM answer_sessions a WHERE a.survey_id = s.id)
     FROM surveys s";

fn row_to_survey(row: &libsql::Row) -> Result<Survey, DatabaseError> {
    Ok(Survey {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        slug: row.get(3)?,
        status: SurveyStatus::from_flag(row.get::<i64>(4)?),
        description: get_opt_string(row, 5)?,
        image: row.get(6)?,
        expire_date: parse_optional_datetime(get_opt_string(row, 7)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        updated_at: parse_datetime(&row.get::<String>(9)?)?,
        questions: Vec::new(),
    })
}

pub(crate) fn row_to_summary(row: &libsql::Row) -> Result<SurveySummary, DatabaseError> {
    Ok(SurveySummary {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        status: SurveyStatus::from_flag(row.get::<i64>(3)?),
        image: row.get(4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        expire_date: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
        question_count: get_count(row, 7)?,
        answer_count: get_count(row, 8)?,
    })
}

/// The survey row without its questions, if it exists.
pub(crate) async fn find_survey_row(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Option<Survey>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM surveys WHERE id = ?1"),
            [id],
        )
        .await?;
    rows.next().await?.map(|row| row_to_survey(&row)).transpose()
}

/// The survey with its questions.
async fn load_survey(conn: &libsql::Connection, id: &str) -> Result<Survey, SurveyError> {
    let mut survey = find_survey_row(conn, id)
        .await?
        .ok_or_else(|| SurveyError::survey_not_found(id))?;
    survey.questions = load_questions(conn, id).await?;
    Ok(survey)
}

/// First free slug for `title`: `base`, `base-2`, `base-3`, ...
async fn unique_slug(conn: &libsql::Connection, title: &str) -> Result<String, DatabaseError> {
    let base = slugify(title);
    let mut n = 1;
    loop {
        let slug = candidate(&base, n);
        let mut rows = conn
            .query("SELECT 1 FROM surveys WHERE slug = ?1", [slug.as_str()])
            .await?;
        if rows.next().await?.is_none() {
            return Ok(slug);
        }
        n += 1;
    }
}

fn validate_title(title: &str) -> Result<String, SurveyError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(SurveyError::ValidationFailed {
            field: "title".into(),
            message: "the title field is required".into(),
        });
    }
    Ok(trimmed.to_string())
}

fn decode_image(data_uri: Option<&str>) -> Result<Option<ImagePayload>, SurveyError> {
    data_uri
        .map(ImagePayload::from_data_uri)
        .transpose()
        .map_err(SurveyError::from)
}

fn not_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl SurveyService {
    async fn save_image(&self, payload: Option<ImagePayload>) -> Result<Option<String>, SurveyError> {
        match payload {
            Some(image) => Ok(Some(self.blob().save(image.bytes, &image.extension).await?)),
            None => Ok(None),
        }
    }

    /// Create a survey owned by `owner_id` with its initial questions.
    ///
    /// The image, if any, is decoded before anything is written and saved
    /// before the transaction opens; it is removed again if the insert fails.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` for a blank title or an invalid question,
    /// `InvalidImageFormat` for a bad data URI, storage errors otherwise.
    pub async fn create_survey(&self, owner_id: &str, input: NewSurvey) -> Result<Survey, SurveyError> {
        let title = validate_title(&input.title)?;
        let plan = reconcile(&[], &input.questions)?;
        let image = decode_image(input.image.as_deref())?;

        let _guard = self.write_gate().await;
        let saved_image = self.save_image(image).await?;
        let image_ref = saved_image
            .clone()
            .unwrap_or_else(|| self.settings().default_image.clone());

        let tx = match self.db().conn().transaction().await {
            Ok(tx) => tx,
            Err(err) => {
                self.discard_image(saved_image.as_deref()).await;
                return Err(err.into());
            }
        };
        let result = async {
            let now = now();
            let id = generate_id_on(&tx, PREFIX_SURVEY).await?;
            let slug = unique_slug(&tx, &title).await?;
            tx.execute(
                &format!(
                    "INSERT INTO surveys ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
                ),
                libsql::params![
                    id.as_str(),
                    owner_id,
                    title.as_str(),
                    slug.as_str(),
                    input.status.as_flag(),
                    not_blank(input.description.clone()),
                    image_ref.as_str(),
                    input.expire_date.map(format_timestamp),
                    format_timestamp(now),
                    format_timestamp(now)
                ],
            )
            .await?;
            apply_plan(&tx, &id, &plan, now).await?;
            load_survey(&tx, &id).await
        }
        .await;

        match Self::finish(tx, result).await {
            Ok(survey) => {
                tracing::info!(
                    survey_id = %survey.id,
                    slug = %survey.slug,
                    questions = survey.questions.len(),
                    "created survey"
                );
                Ok(survey)
            }
            Err(err) => {
                self.discard_image(saved_image.as_deref()).await;
                Err(err)
            }
        }
    }

    /// Apply `patch` to a survey owned by `caller_id`.
    ///
    /// Scalar fields and the question reconcile commit in one transaction.
    /// A replaced image is deleted from the blob store only after commit.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown survey, `Unauthorized` if the caller is not
    /// the owner, `ValidationFailed`/`InvalidImageFormat` for bad input
    /// (before any mutation), storage errors otherwise.
    pub async fn update_survey(
        &self,
        survey_id: &str,
        caller_id: &str,
        patch: SurveyPatch,
    ) -> Result<Survey, SurveyError> {
        let title = patch.title.as_deref().map(validate_title).transpose()?;
        let image = decode_image(patch.image.as_deref())?;

        let _guard = self.write_gate().await;
        let current = find_survey_row(self.db().conn(), survey_id)
            .await?
            .ok_or_else(|| SurveyError::survey_not_found(survey_id))?;
        if !current.is_owned_by(caller_id) {
            return Err(SurveyError::Unauthorized {
                survey_id: survey_id.to_string(),
            });
        }

        let plan = match &patch.questions {
            Some(incoming) => {
                let existing = question_ids(self.db().conn(), survey_id).await?;
                Some(reconcile(&existing, incoming)?)
            }
            None => None,
        };

        let saved_image = self.save_image(image).await?;

        let tx = match self.db().conn().transaction().await {
            Ok(tx) => tx,
            Err(err) => {
                self.discard_image(saved_image.as_deref()).await;
                return Err(err.into());
            }
        };
        let result = async {
            let now = now();
            update_survey_row(&tx, survey_id, &patch, title, saved_image.as_deref(), now).await?;
            if let Some(plan) = &plan {
                apply_plan(&tx, survey_id, plan, now).await?;
            }
            load_survey(&tx, survey_id).await
        }
        .await;

        let survey = match Self::finish(tx, result).await {
            Ok(survey) => survey,
            Err(err) => {
                self.discard_image(saved_image.as_deref()).await;
                return Err(err);
            }
        };

        tracing::info!(
            survey_id,
            questions = survey.questions.len(),
            reconciled = plan.as_ref().is_some_and(|p| !p.is_empty()),
            "updated survey"
        );

        if saved_image.is_some() {
            self.release_image(&current.image).await;
        }
        Ok(survey)
    }

    /// Delete a survey owned by `caller_id`, cascading to its questions and
    /// answers, then remove its uploaded image.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Unauthorized`, or storage errors.
    pub async fn delete_survey(&self, survey_id: &str, caller_id: &str) -> Result<(), SurveyError> {
        let _guard = self.write_gate().await;
        let survey = find_survey_row(self.db().conn(), survey_id)
            .await?
            .ok_or_else(|| SurveyError::survey_not_found(survey_id))?;
        if !survey.is_owned_by(caller_id) {
            return Err(SurveyError::Unauthorized {
                survey_id: survey_id.to_string(),
            });
        }

        self.db()
            .conn()
            .execute("DELETE FROM surveys WHERE id = ?1", [survey_id])
            .await?;
        tracing::info!(survey_id, "deleted survey");

        self.release_image(&survey.image).await;
        Ok(())
    }

    /// Owner view of a survey, with questions.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Unauthorized` if `caller_id` is not the owner.
    pub async fn get_survey(&self, survey_id: &str, caller_id: &str) -> Result<Survey, SurveyError> {
        let _guard = self.read_gate().await;
        let survey = load_survey(self.db().conn(), survey_id).await?;
        if !survey.is_owned_by(caller_id) {
            return Err(SurveyError::Unauthorized {
                survey_id: survey_id.to_string(),
            });
        }
        Ok(survey)
    }

    /// Guest view of a survey by slug. Only published, unexpired surveys
    /// are visible.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown slug, `Forbidden` for drafts and expired
    /// surveys.
    pub async fn get_survey_by_slug(&self, slug: &str) -> Result<Survey, SurveyError> {
        self.get_survey_by_slug_at(slug, Utc::now()).await
    }

    /// [`Self::get_survey_by_slug`] evaluated at `at`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_survey_by_slug`].
    pub async fn get_survey_by_slug_at(
        &self,
        slug: &str,
        at: DateTime<Utc>,
    ) -> Result<Survey, SurveyError> {
        let _guard = self.read_gate().await;
        let mut rows = self
            .db()
            .conn()
            .query("SELECT id FROM surveys WHERE slug = ?1", [slug])
            .await?;
        let Some(row) = rows.next().await? else {
            return Err(SurveyError::NotFound {
                entity: "survey",
                id: slug.to_string(),
            });
        };
        let id = row.get::<String>(0)?;
        let survey = load_survey(self.db().conn(), &id).await?;
        if !survey.is_open_at(at) {
            return Err(SurveyError::Forbidden { survey_id: id });
        }
        Ok(survey)
    }

    /// An owner's surveys, newest first.
    ///
    /// # Errors
    ///
    /// Storage errors only.
    pub async fn list_surveys_for_owner(
        &self,
        owner_id: &str,
        page: PageRequest,
    ) -> Result<Page<SurveySummary>, SurveyError> {
        let _guard = self.read_gate().await;
        let conn = self.db().conn();

        let mut rows = conn
            .query("SELECT COUNT(*) FROM surveys WHERE owner_id = ?1", [owner_id])
            .await?;
        let total = match rows.next().await? {
            Some(row) => get_count(&row, 0)?,
            None => 0,
        };

        let mut rows = conn
            .query(
                &format!(
                    "{SUMMARY_SELECT}
                     WHERE s.owner_id = ?1
                     ORDER BY s.created_at DESC, s.rowid DESC
                     LIMIT ?2 OFFSET ?3"
                ),
                libsql::params![
                    owner_id,
                    i64::from(page.limit()),
                    i64::try_from(page.offset()).unwrap_or(i64::MAX)
                ],
            )
            .await?;
        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(row_to_summary(&row)?);
        }
        tracing::debug!(owner_id, total, returned = items.len(), "listed surveys");
        Ok(Page::new(items, page, total))
    }

    /// [`Self::list_surveys_for_owner`] with the configured page size.
    ///
    /// # Errors
    ///
    /// Storage errors only.
    pub async fn list_surveys_page(
        &self,
        owner_id: &str,
        page: u32,
    ) -> Result<Page<SurveySummary>, SurveyError> {
        let request = PageRequest::new(page, self.settings().page_size);
        self.list_surveys_for_owner(owner_id, request).await
    }
}

/// Dynamic UPDATE over the fields the patch touches, plus `updated_at`.
async fn update_survey_row(
    conn: &libsql::Connection,
    survey_id: &str,
    patch: &SurveyPatch,
    title: Option<String>,
    image: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(), DatabaseError> {
    let mut sets = Vec::new();
    let mut params: Vec<libsql::Value> = Vec::new();
    let mut idx = 1usize;

    if let Some(title) = title {
        sets.push(format!("title = ?{idx}"));
        params.push(title.into());
        idx += 1;
    }
    if let Some(ref description) = patch.description {
        sets.push(format!("description = ?{idx}"));
        params.push(not_blank(description.clone()).map_or(libsql::Value::Null, Into::into));
        idx += 1;
    }
    if let Some(status) = patch.status {
        sets.push(format!("status = ?{idx}"));
        params.push(status.as_flag().into());
        idx += 1;
    }
    if let Some(expire_date) = patch.expire_date {
        sets.push(format!("expire_date = ?{idx}"));
        params.push(expire_date.map_or(libsql::Value::Null, |dt| format_timestamp(dt).into()));
        idx += 1;
    }
    if let Some(image) = image {
        sets.push(format!("image = ?{idx}"));
        params.push(image.into());
        idx += 1;
    }

    sets.push(format!("updated_at = ?{idx}"));
    params.push(format_timestamp(now).into());
    idx += 1;

    params.push(survey_id.into());
    let sql = format!("UPDATE surveys SET {} WHERE id = ?{idx}", sets.join(", "));
    conn.execute(&sql, libsql::params_from_iter(params)).await?;
    Ok(())
}
