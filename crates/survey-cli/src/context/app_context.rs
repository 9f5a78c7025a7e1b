use anyhow::Context;
use survey_config::SurveyConfig;
use survey_db::service::SurveyService;

use crate::cli::GlobalFlags;

/// Environment variable naming the acting user when `--user` is absent.
pub const USER_ENV: &str = "SURVEY_USER";

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: SurveyService,
    pub config: SurveyConfig,
    pub user: Option<String>,
}

impl AppContext {
    /// Open the survey service described by `config`.
    pub async fn init(config: SurveyConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let service = SurveyService::from_config(&config)
            .await
            .with_context(|| format!("failed to open survey store at {}", config.database.path))?;
        tracing::debug!(
            database = %config.database.path,
            r2 = config.r2.is_configured(),
            "survey service ready"
        );

        let user = resolve_user(flags.user.as_deref(), std::env::var(USER_ENV).ok());
        Ok(Self {
            service,
            config,
            user,
        })
    }

    /// The acting user, required by every owner operation.
    pub fn require_user(&self) -> anyhow::Result<&str> {
        self.user.as_deref().ok_or_else(|| {
            anyhow::anyhow!("no acting user. Pass --user <id> or set {USER_ENV}.")
        })
    }
}

fn resolve_user(flag: Option<&str>, env: Option<String>) -> Option<String> {
    flag.map(str::to_string)
        .or(env)
        .map(|user| user.trim().to_string())
        .filter(|user| !user.is_empty())
}
