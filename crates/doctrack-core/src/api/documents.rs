use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_LIMIT, DEFAULT_REMINDER_WINDOW_DAYS, MAX_PAGE_LIMIT};
use crate::models::Document;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListDocumentsQuery {
    #[serde(default)]
    pub skip: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl ListDocumentsQuery {
    /// `(offset, limit)` after clamping to the supported range.
    #[must_use]
    pub fn page(&self) -> (i64, i64) {
        let skip = self.skip.unwrap_or(0).max(0);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(0, MAX_PAGE_LIMIT);
        (skip, limit)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExpiringQuery {
    #[serde(default)]
    pub days: Option<i64>,
}

impl ExpiringQuery {
    #[must_use]
    pub fn days(&self) -> i64 {
        self.days.unwrap_or(DEFAULT_REMINDER_WINDOW_DAYS)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExpiringDocumentsResponse {
    pub expiring_documents: Vec<Document>,
    pub count: usize,
    pub days_ahead: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MessageResponse {
    pub message: String,
}
