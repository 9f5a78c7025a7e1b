mod read;
mod write;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SurveyCommands;
use crate::context::AppContext;

/// Handle `svy survey`.
pub async fn handle(
    action: &SurveyCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SurveyCommands::Create { file } => write::create(file, ctx, flags).await,
        SurveyCommands::Update { id, file } => write::update(id, file, ctx, flags).await,
        SurveyCommands::Delete { id } => write::delete(id, ctx, flags).await,
        SurveyCommands::Get { id } => read::get(id, ctx, flags).await,
        SurveyCommands::BySlug { slug } => read::by_slug(slug, ctx, flags).await,
        SurveyCommands::List { page } => read::list(*page, ctx, flags).await,
        SurveyCommands::Answers { id } => read::answers(id, ctx, flags).await,
    }
}
