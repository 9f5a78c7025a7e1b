use crate::cli::GlobalFlags;
use crate::commands::shared::status::with_status;
use crate::context::AppContext;
use crate::output::output;

pub async fn get(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let caller = ctx.require_user()?;
    let survey = ctx
        .service
        .get_survey(id, caller)
        .await
        .map_err(with_status)?;
    output(&survey, flags.format)
}

/// Guest read; needs no acting user.
pub async fn by_slug(slug: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let survey = ctx
        .service
        .get_survey_by_slug(slug)
        .await
        .map_err(with_status)?;
    output(&survey, flags.format)
}

pub async fn list(page: u32, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let owner = ctx.require_user()?;
    let surveys = ctx
        .service
        .list_surveys_page(owner, page)
        .await
        .map_err(with_status)?;
    output(&surveys, flags.format)
}

pub async fn answers(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let caller = ctx.require_user()?;
    let summaries = ctx
        .service
        .answers_by_question(id, caller)
        .await
        .map_err(with_status)?;
    output(&summaries, flags.format)
}
