//! General application configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default page size for owner survey lists and answer logs.
const fn default_page_size() -> u32 {
    5
}

/// Default window for the dashboard's latest answers.
const fn default_latest_answers_limit() -> u32 {
    5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Default page size for paginated list commands.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// How many answer sessions the dashboard shows as "latest".
    #[serde(default = "default_latest_answers_limit")]
    pub latest_answers_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            latest_answers_limit: default_latest_answers_limit(),
        }
    }
}

impl GeneralConfig {
    /// Reject values that would make pagination meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "general.page_size".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.latest_answers_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "general.latest_answers_limit".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
