use std::path::Path;

use anyhow::Context;
use survey_config::SurveyConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, layered configuration, then apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<SurveyConfig> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    load_dotenv(&cwd)?;

    let mut config = SurveyConfig::load().context("failed to load survey configuration")?;
    apply_overrides(&mut config, flags);
    Ok(config)
}

fn load_dotenv(dir: &Path) -> anyhow::Result<()> {
    let env_path = dir.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}

fn apply_overrides(config: &mut SurveyConfig, flags: &GlobalFlags) {
    if let Some(path) = &flags.database {
        config.database.path.clone_from(path);
    }
    if let Some(limit) = flags.limit.filter(|limit| *limit > 0) {
        config.general.page_size = limit;
    }
}
