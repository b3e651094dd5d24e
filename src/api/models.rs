//! Response envelopes for the roster and registration endpoints.
//!
//! Every endpoint answers with the same JSON shape:
//!
//! ```json
//! {
//!   "message": "Data fetched successfully!",
//!   "data": [ { "_id": "665f1c...", "groupId": "G1", "groupMemberCount": 2, "...": "..." } ],
//!   "totalItems": 1,
//!   "totalPages": 1,
//!   "currentPage": 1,
//!   "hasNext": false,
//!   "hasPrev": false
//! }
//! ```
//!
//! Failures carry `message` plus an optional `error` with diagnostic detail.
//! Registration creation adds `wymaNumber`, the allocated sequential identifier.

use serde::Serialize;
use std::collections::HashMap;

use crate::observability::MetricsSnapshot;
use crate::query::PageInfo;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wyma_number: Option<i64>,
    #[serde(flatten)]
    pub page: Option<PageInfo>,
}

impl<T> ApiResponse<T> {
    pub fn new(message: &'static str, data: T) -> Self {
        Self {
            message,
            data: Some(data),
            wyma_number: None,
            page: None,
        }
    }

    pub fn with_page(mut self, page: PageInfo) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_wyma_number(mut self, sequential_id: i64) -> Self {
        self.wyma_number = Some(sequential_id);
        self
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: HashMap<String, String>,
    pub version: String,
    pub counters: MetricsSnapshot,
}
