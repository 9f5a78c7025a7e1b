use serde_json::json;
use survey_db::updates::survey::{NewSurvey, SurveyPatch};

use crate::cli::GlobalFlags;
use crate::commands::shared::input::read_json;
use crate::commands::shared::status::with_status;
use crate::context::AppContext;
use crate::output::output;

pub async fn create(file: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let owner = ctx.require_user()?;
    let input: NewSurvey = read_json(file)?;
    let survey = ctx
        .service
        .create_survey(owner, input)
        .await
        .map_err(with_status)?;
    output(&survey, flags.format)
}

pub async fn update(
    id: &str,
    file: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let caller = ctx.require_user()?;
    let patch: SurveyPatch = read_json(file)?;
    let survey = ctx
        .service
        .update_survey(id, caller, patch)
        .await
        .map_err(with_status)?;
    output(&survey, flags.format)
}

pub async fn delete(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let caller = ctx.require_user()?;
    ctx.service
        .delete_survey(id, caller)
        .await
        .map_err(with_status)?;
    output(&json!({ "deleted": id }), flags.format)
}
