//! HTTP access to the feed API.

use std::sync::Arc;

use serde::Deserialize;

use jobscroll_core::{JobId, JobPosting, JobsQuery};

use crate::error::ClientError;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Body of `GET /api/jobs` as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobsPage {
    pub jobs: Vec<JobPosting>,
    #[serde(default)]
    pub next_cursor: Option<JobId>,
}

/// Anything that can serve feed pages for a query.
#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_page(&self, query: &JobsQuery) -> Result<JobsPage, ClientError>;
}

#[async_trait::async_trait]
impl<S> FeedSource for Arc<S>
where
    S: FeedSource + ?Sized,
{
    async fn fetch_page(&self, query: &JobsQuery) -> Result<JobsPage, ClientError> {
        (**self).fetch_page(query).await
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Thin `reqwest` wrapper around the feed endpoints.
#[derive(Debug, Clone)]
pub struct FeedClient {
    api_url: String,
    http: reqwest::Client,
}

impl FeedClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            api_url,
            http: reqwest::Client::new(),
        }
    }

    /// Client for `JOBSCROLL_API_URL` (default `http://localhost:8080`).
    pub fn from_env() -> Self {
        let url = std::env::var("JOBSCROLL_API_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(url)
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Check if the API is reachable.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/health", self.api_url);
        matches!(self.http.get(&url).send().await, Ok(res) if res.status().is_success())
    }

    /// Fetch one page; `query.cursor` selects the page.
    pub async fn jobs(&self, query: &JobsQuery) -> Result<JobsPage, ClientError> {
        let url = format!("{}/api/jobs", self.api_url);
        let res = self.http.get(&url).query(&query.pairs()).send().await?;
        read_json(res).await
    }

    /// A single posting; `None` when it is unknown or no longer active.
    pub async fn job(&self, id: JobId) -> Result<Option<JobPosting>, ClientError> {
        let url = format!("{}/api/jobs/{}", self.api_url, id);
        let res = self.http.get(&url).send().await?;
        if res.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        read_json(res).await.map(Some)
    }
}

#[async_trait::async_trait]
impl FeedSource for FeedClient {
    async fn fetch_page(&self, query: &JobsQuery) -> Result<JobsPage, ClientError> {
        self.jobs(query).await
    }
}

async fn read_json<T>(res: reqwest::Response) -> Result<T, ClientError>
where
    T: serde::de::DeserializeOwned,
{
    let status = res.status();
    if status.is_success() {
        return Ok(res.json().await?);
    }

    let text = res.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<ApiErrorBody>(&text) {
        Ok(body) => (body.error, body.message.unwrap_or(text)),
        Err(_) => (None, text),
    };
    Err(ClientError::Api {
        status: status.as_u16(),
        code,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_dropped_from_the_base_url() {
        assert_eq!(FeedClient::new("http://api.local/").api_url(), "http://api.local");
    }

    #[test]
    fn last_page_has_no_cursor() {
        let page: JobsPage = serde_json::from_str(r#"{"jobs":[]}"#).unwrap();
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn stale_cursor_is_recognised() {
        let err = ClientError::Api {
            status: 404,
            code: Some("cursor_not_found".into()),
            message: "gone".into(),
        };
        assert!(err.is_stale_cursor());
        assert!(!ClientError::Network("down".into()).is_stale_cursor());
    }
}
