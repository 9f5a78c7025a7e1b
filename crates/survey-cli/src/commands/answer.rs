use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AnswerCommands;
use crate::commands::shared::input::{answer_submission, read_json, timestamp};
use crate::commands::shared::status::with_status;
use crate::context::AppContext;
use crate::output::output;

/// Handle `svy answer`.
pub async fn handle(
    action: &AnswerCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AnswerCommands::Submit {
            survey_id,
            file,
            at,
        } => submit(survey_id, file, at.as_deref(), ctx, flags).await,
        AnswerCommands::Show { session_id } => show(session_id, ctx, flags).await,
    }
}

/// Respondents are anonymous; no acting user is needed.
async fn submit(
    survey_id: &str,
    file: &str,
    at: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let submission = answer_submission(read_json::<Value>(file)?)?;
    let session = match at {
        Some(raw) => {
            ctx.service
                .submit_answers_at(survey_id, &submission, timestamp(raw)?)
                .await
        }
        None => ctx.service.submit_answers(survey_id, &submission).await,
    }
    .map_err(with_status)?;
    output(&session, flags.format)
}

async fn show(session_id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let caller = ctx.require_user()?;
    let (session, answers) = ctx
        .service
        .session_answers(session_id, caller)
        .await
        .map_err(with_status)?;
    output(
        &serde_json::json!({
            "session": session,
            "answers": answers,
        }),
        flags.format,
    )
}
