//! Offset pagination with length-aware metadata.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A 1-based page request. Zero values are clamped to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    #[must_use]
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.per_page
    }
}

/// One page of results plus the metadata a paginator needs.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub per_page: u32,
    pub total: u64,
    pub last_page: u32,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        let pages = total.div_ceil(u64::from(request.per_page)).max(1);
        Self {
            items,
            current_page: request.page,
            per_page: request.per_page,
            total,
            last_page: u32::try_from(pages).unwrap_or(u32::MAX),
        }
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }
}
