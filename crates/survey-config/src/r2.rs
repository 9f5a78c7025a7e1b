//! Cloudflare R2 configuration for survey images.

use serde::{Deserialize, Serialize};

/// Default bucket name.
fn default_bucket_name() -> String {
    String::from("survey-images")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct R2Config {
    /// Cloudflare account ID.
    #[serde(default)]
    pub account_id: String,

    /// R2 access key ID.
    #[serde(default)]
    pub access_key_id: String,

    /// R2 secret access key.
    #[serde(default)]
    pub secret_access_key: String,

    /// R2 bucket name.
    #[serde(default = "default_bucket_name")]
    pub bucket_name: String,

    /// Custom endpoint URL. If empty, built from `account_id`.
    #[serde(default)]
    pub endpoint: String,
}

impl Default for R2Config {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            bucket_name: default_bucket_name(),
            endpoint: String::new(),
        }
    }
}

impl R2Config {
    /// Check if the R2 config has the minimum required fields.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.account_id.is_empty()
            && !self.access_key_id.is_empty()
            && !self.secret_access_key.is_empty()
            && !self.bucket_name.is_empty()
    }

    /// Build the R2 endpoint URL.
    ///
    /// Returns the custom `endpoint` if set, otherwise builds from `account_id`.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        if self.endpoint.is_empty() {
            format!("https://{}.r2.cloudflarestorage.com", self.account_id)
        } else {
            self.endpoint.clone()
        }
    }
}
