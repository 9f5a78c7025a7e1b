use clap::Subcommand;

/// Dashboard commands.
#[derive(Clone, Debug, Subcommand)]
pub enum DashboardCommands {
    /// Totals, latest survey and latest answers.
    Summary,
    /// Paginated answer log.
    Logs {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}
