use clap::Subcommand;

use crate::cli::subcommands::{AnswerCommands, DashboardCommands, SurveyCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Owner survey management and guest reads.
    Survey {
        #[command(subcommand)]
        action: SurveyCommands,
    },
    /// Answer submission and session reads.
    Answer {
        #[command(subcommand)]
        action: AnswerCommands,
    },
    /// Owner dashboard.
    Dashboard {
        #[command(subcommand)]
        action: DashboardCommands,
    },
}
