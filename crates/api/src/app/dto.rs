use serde::{Deserialize, Serialize};

use jobscroll_core::{JobId, JobPosting, Page};

// -------------------------
// Response DTOs
// -------------------------

/// Body of `GET /api/jobs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobsResponse {
    pub jobs: Vec<JobPosting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<JobId>,
}

impl From<Page<JobPosting>> for JobsResponse {
    fn from(page: Page<JobPosting>) -> Self {
        Self {
            jobs: page.items,
            next_cursor: page.next_cursor,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
