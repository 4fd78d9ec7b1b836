//! Request handlers, grouped by route prefix.

pub mod admin;
pub mod auth;
pub mod blogs;
pub mod users;

use serde::Deserialize;
use serde::Serialize;

/// Common `page`/`limit` query parameters.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// 1-based page number, default 1.
    #[serde(default)]
    pub page: Option<usize>,
    /// Page size, default 10.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl PageQuery {
    /// Resolved page number.
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    /// Resolved page size.
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(10).max(1)
    }
}

/// Plain confirmation body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Confirmation text.
    pub message: String,
}

impl MessageResponse {
    /// Build a confirmation body.
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
