use survey_config::SurveyConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &SurveyConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &SurveyConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.r2.is_configured() && has_env_prefix(&env_keys, "SURVEY_R2") {
        warnings.push(
            "R2 config appears default while SURVEY_R2* env vars exist. Use double underscores (example: SURVEY_R2__ACCOUNT_ID)."
                .to_string(),
        );
    }

    for section in ["DATABASE", "STORAGE", "GENERAL"] {
        let single = format!("SURVEY_{section}_");
        let double = format!("SURVEY_{section}__");
        if env_keys
            .iter()
            .any(|key| key.starts_with(&single) && !key.starts_with(&double))
        {
            warnings.push(format!(
                "{single}* env vars are ignored. Use double underscores (example: {double}{}).",
                example_key(section)
            ));
        }
    }

    warnings
}

fn example_key(section: &str) -> &'static str {
    match section {
        "DATABASE" => "PATH",
        "STORAGE" => "IMAGE_DIR",
        _ => "PAGE_SIZE",
    }
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}
