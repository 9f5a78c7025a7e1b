use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Survey { action } => commands::survey::handle(&action, ctx, flags).await,
        Commands::Answer { action } => commands::answer::handle(&action, ctx, flags).await,
        Commands::Dashboard { action } => commands::dashboard::handle(&action, ctx, flags).await,
    }
}
