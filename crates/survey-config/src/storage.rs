//! Local image storage layout.

use serde::{Deserialize, Serialize};

fn default_image_dir() -> String {
    String::from("public")
}

fn default_image_prefix() -> String {
    String::from("images")
}

fn default_default_image() -> String {
    String::from("images/default-survey.png")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Root directory of the local blob store. Ignored when R2 is configured.
    #[serde(default = "default_image_dir")]
    pub image_dir: String,

    /// Key prefix under which uploaded survey images are written.
    #[serde(default = "default_image_prefix")]
    pub image_prefix: String,

    /// Image reference given to surveys created without an image.
    /// Never deleted from the blob store.
    #[serde(default = "default_default_image")]
    pub default_image: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            image_dir: default_image_dir(),
            image_prefix: default_image_prefix(),
            default_image: default_default_image(),
        }
    }
}
