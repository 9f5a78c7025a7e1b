use clap::Subcommand;

/// Survey commands. Definition files are JSON; `-` reads stdin.
#[derive(Clone, Debug, Subcommand)]
pub enum SurveyCommands {
    /// Create a survey from a JSON definition.
    Create { file: String },
    /// Apply a JSON patch to a survey (questions are reconciled by id).
    Update { id: String, file: String },
    /// Delete a survey with its questions and answers.
    Delete { id: String },
    /// Get an owned survey with its questions.
    Get { id: String },
    /// Guest view of a published survey.
    #[command(name = "by-slug")]
    BySlug { slug: String },
    /// List owned surveys, newest first.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Per-question answer tallies for an owned survey.
    Answers { id: String },
}
