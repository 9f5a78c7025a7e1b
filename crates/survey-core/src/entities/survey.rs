use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Question;
use crate::enums::SurveyStatus;

/// An owned, titled collection of ordered questions.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Survey {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub slug: String,
    pub status: SurveyStatus,
    pub description: Option<String>,
    /// Blob-store path of the cover image, or the configured default.
    pub image: String,
    pub expire_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Questions in persisted insertion order.
    pub questions: Vec<Question>,
}

impl Survey {
    #[must_use]
    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }

    /// A survey with no expiry never expires.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expire_date.is_some_and(|expire| expire <= now)
    }

    /// Guests may view and answer only published, unexpired surveys.
    #[must_use]
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.status.is_published() && !self.is_expired_at(now)
    }

    #[must_use]
    pub fn question_ids(&self) -> Vec<String> {
        self.questions.iter().map(|q| q.id.clone()).collect()
    }
}
