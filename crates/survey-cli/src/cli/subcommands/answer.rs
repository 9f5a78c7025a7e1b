use clap::Subcommand;

/// Answer commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AnswerCommands {
    /// Submit answers to a published survey from a JSON file.
    Submit {
        survey_id: String,
        file: String,
        /// Submission time (RFC 3339), defaults to now.
        #[arg(long)]
        at: Option<String>,
    },
    /// Show the answers recorded in one session.
    Show { session_id: String },
}
