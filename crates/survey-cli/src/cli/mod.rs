use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `svy` binary.
#[derive(Debug, Parser)]
#[command(name = "svy", version, about = "Survey builder - create surveys, collect answers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Page size for lists and logs
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Acting user id (falls back to SURVEY_USER)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Database path override (use :memory: for a throwaway store)
    #[arg(long, global = true)]
    pub database: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            user: self.user.clone(),
            database: self.database.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::subcommands::{AnswerCommands, DashboardCommands, SurveyCommands};
    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "svy",
            "--format",
            "table",
            "--user",
            "user-1",
            "--verbose",
            "dashboard",
            "summary",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.user.as_deref(), Some("user-1"));
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Dashboard {
                action: DashboardCommands::Summary
            }
        ));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "svy", "survey", "list", "--page", "2", "--limit", "3", "--quiet",
        ])
        .expect("cli should parse");

        assert_eq!(cli.limit, Some(3));
        assert!(cli.quiet);
        match cli.command {
            Commands::Survey {
                action: SurveyCommands::List { page },
            } => assert_eq!(page, 2),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn by_slug_uses_kebab_name() {
        let cli = Cli::try_parse_from(["svy", "survey", "by-slug", "team-lunch"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Survey {
                action: SurveyCommands::BySlug { ref slug }
            } if slug == "team-lunch"
        ));
    }

    #[test]
    fn answer_submit_takes_survey_and_file() {
        let cli = Cli::try_parse_from([
            "svy",
            "answer",
            "submit",
            "svy-1a2b3c4d",
            "answers.json",
            "--at",
            "2026-01-01T00:00:00Z",
        ])
        .expect("cli should parse");
        match cli.command {
            Commands::Answer {
                action: AnswerCommands::Submit { survey_id, file, at },
            } => {
                assert_eq!(survey_id, "svy-1a2b3c4d");
                assert_eq!(file, "answers.json");
                assert_eq!(at.as_deref(), Some("2026-01-01T00:00:00Z"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["svy", "--format", "xml", "dashboard", "summary"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn survey_update_requires_file() {
        let parsed = Cli::try_parse_from(["svy", "survey", "update", "svy-1"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["svy", "--database", ":memory:", "dashboard", "logs"])
            .expect("cli should parse");
        let flags = cli.global_flags();
        assert_eq!(flags.database.as_deref(), Some(":memory:"));
        assert_eq!(flags.format, OutputFormat::Json);
        assert_eq!(flags.user, None);
    }
}
