//! Local libSQL database location.

use serde::{Deserialize, Serialize};

/// Sentinel path that opens a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

fn default_path() -> String {
    String::from(".survey/survey.db")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Filesystem path of the libSQL database file, or `:memory:`.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

impl DatabaseConfig {
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY_PATH
    }
}
