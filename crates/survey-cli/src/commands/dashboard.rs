use survey_core::pagination::PageRequest;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::DashboardCommands;
use crate::commands::shared::status::with_status;
use crate::context::AppContext;
use crate::output::output;

/// Handle `svy dashboard`.
pub async fn handle(
    action: &DashboardCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let owner = ctx.require_user()?;
    match action {
        DashboardCommands::Summary => {
            let summary = ctx.service.dashboard(owner).await.map_err(with_status)?;
            output(&summary, flags.format)
        }
        DashboardCommands::Logs { page } => {
            let request = PageRequest::new(*page, ctx.config.general.page_size);
            let logs = ctx
                .service
                .logs(owner, request)
                .await
                .map_err(with_status)?;
            output(&logs, flags.format)
        }
    }
}
