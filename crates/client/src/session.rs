//! Infinite-scroll feed session.
//!
//! A session owns the postings loaded so far and the cursor of the next page.
//! The UI calls [`FeedSession::load_more`] whenever the end of the list comes
//! into view; at most one page request is in flight per session, so a burst of
//! triggers while a load is pending costs nothing.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

use jobscroll_core::{JobId, JobPosting, JobsQuery, PageSize};

use crate::api::{FeedSource, JobsPage};
use crate::error::ClientError;

/// Result of a [`FeedSession::load_more`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page arrived and this many postings were appended.
    Loaded(usize),
    /// Another load is still pending; nothing was requested.
    Busy,
    /// The feed has no further pages; nothing was requested.
    Exhausted,
    /// The session was reset while the page was in flight; it was discarded.
    Stale,
}

#[derive(Debug, Default)]
struct FeedState {
    filters: JobsQuery,
    jobs: Vec<JobPosting>,
    next_cursor: Option<JobId>,
    started: bool,
    /// Bumped by every reset so pages fetched for older filters are dropped.
    generation: u64,
}

impl FeedState {
    fn has_more(&self) -> bool {
        !self.started || self.next_cursor.is_some()
    }
}

/// Clears the in-flight flag however the load ends (including cancellation).
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct FeedSession<S> {
    source: S,
    page_size: Option<PageSize>,
    loading: AtomicBool,
    state: Mutex<FeedState>,
}

impl<S> FeedSession<S>
where
    S: FeedSource,
{
    /// Empty session; the first `load_more` fetches the first page.
    pub fn new(source: S, filters: JobsQuery) -> Self {
        Self::from_state(
            source,
            FeedState {
                filters: without_paging(filters),
                ..FeedState::default()
            },
        )
    }

    /// Session continuing from a first page rendered elsewhere.
    pub fn with_first_page(source: S, filters: JobsQuery, first: JobsPage) -> Self {
        Self::from_state(
            source,
            FeedState {
                filters: without_paging(filters),
                jobs: first.jobs,
                next_cursor: first.next_cursor,
                started: true,
                generation: 0,
            },
        )
    }

    fn from_state(source: S, state: FeedState) -> Self {
        Self {
            source,
            page_size: None,
            loading: AtomicBool::new(false),
            state: Mutex::new(state),
        }
    }

    /// Request pages of this size instead of the server default.
    pub fn page_size(mut self, size: PageSize) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Fetch the next page unless one is already loading or the feed is done.
    ///
    /// On error the session is left unchanged, so calling again retries the
    /// same page.
    pub async fn load_more(&self) -> Result<LoadOutcome, ClientError> {
        if self.loading.swap(true, Ordering::AcqRel) {
            return Ok(LoadOutcome::Busy);
        }
        let _guard = InFlight(&self.loading);

        let (query, generation) = {
            let state = self.state.lock().await;
            if !state.has_more() {
                return Ok(LoadOutcome::Exhausted);
            }
            let mut query = state.filters.clone();
            if let Some(cursor) = state.next_cursor {
                query = query.with_cursor(cursor);
            }
            if let Some(size) = self.page_size {
                query = query.with_limit(size);
            }
            (query, state.generation)
        };

        let page = match self.source.fetch_page(&query).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load more jobs");
                return Err(e);
            }
        };

        let mut state = self.state.lock().await;
        if state.generation != generation {
            tracing::debug!("discarding page fetched before a reset");
            return Ok(LoadOutcome::Stale);
        }
        let added = page.jobs.len();
        state.started = true;
        // An empty page ends the feed even if the server sent a cursor.
        state.next_cursor = if added == 0 { None } else { page.next_cursor };
        state.jobs.extend(page.jobs);
        Ok(LoadOutcome::Loaded(added))
    }

    /// Replace the filters and drop everything loaded so far.
    pub async fn reset(&self, filters: JobsQuery) {
        let mut state = self.state.lock().await;
        *state = FeedState {
            filters: without_paging(filters),
            generation: state.generation.wrapping_add(1),
            ..FeedState::default()
        };
    }

    pub async fn jobs(&self) -> Vec<JobPosting> {
        self.state.lock().await.jobs.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.jobs.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn has_more(&self) -> bool {
        self.state.lock().await.has_more()
    }

    pub async fn filters(&self) -> JobsQuery {
        self.state.lock().await.filters.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }
}

// Paging parameters belong to the session, never to the filter set.
fn without_paging(mut filters: JobsQuery) -> JobsQuery {
    filters.cursor = None;
    filters.limit = None;
    filters
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use chrono::{TimeZone, Utc};
    use tokio::sync::Notify;
    use uuid::Uuid;

    use super::*;

    fn id(n: u128) -> JobId {
        JobId::from_uuid(Uuid::from_u128(n))
    }

    fn posting(n: u128) -> JobPosting {
        let at = Utc.timestamp_opt(1_700_000_000 - n as i64, 0).unwrap();
        JobPosting::new(id(n), format!("Job {n}"), "Acme", at)
    }

    /// Serves postings 1..=total in pages of two, recording every query.
    struct Paged {
        total: u128,
        calls: AtomicUsize,
        queries: std::sync::Mutex<Vec<JobsQuery>>,
        gate: Option<Arc<Notify>>,
        fail: AtomicBool,
    }

    impl Paged {
        fn new(total: u128) -> Self {
            Self {
                total,
                calls: AtomicUsize::new(0),
                queries: std::sync::Mutex::new(Vec::new()),
                gate: None,
                fail: AtomicBool::new(false),
            }
        }
    }

    #[async_trait::async_trait]
    impl FeedSource for Paged {
        async fn fetch_page(&self, query: &JobsQuery) -> Result<JobsPage, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(ClientError::Network("connection reset".into()));
            }

            let start = match query.cursor().unwrap() {
                Some(c) => c.as_uuid().as_u128() + 1,
                None => 1,
            };
            let end = (start + 1).min(self.total);
            let jobs: Vec<JobPosting> = (start..=end).map(posting).collect();
            let next_cursor = (end < self.total).then(|| id(end));
            Ok(JobsPage { jobs, next_cursor })
        }
    }

    fn ids(jobs: &[JobPosting]) -> Vec<u128> {
        jobs.iter().map(|j| j.id.as_uuid().as_u128()).collect()
    }

    #[tokio::test]
    async fn loads_pages_until_the_feed_ends() {
        let session = FeedSession::new(Paged::new(5), JobsQuery::default());

        assert_eq!(session.load_more().await.unwrap(), LoadOutcome::Loaded(2));
        assert_eq!(session.load_more().await.unwrap(), LoadOutcome::Loaded(2));
        assert_eq!(session.load_more().await.unwrap(), LoadOutcome::Loaded(1));
        assert!(!session.has_more().await);
        assert_eq!(session.load_more().await.unwrap(), LoadOutcome::Exhausted);

        assert_eq!(ids(&session.jobs().await), vec![1, 2, 3, 4, 5]);
        assert_eq!(session.source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn second_trigger_while_loading_does_not_issue_a_request() {
        let gate = Arc::new(Notify::new());
        let source = Paged {
            gate: Some(gate.clone()),
            ..Paged::new(5)
        };
        let session = Arc::new(FeedSession::new(source, JobsQuery::default()));

        let first = tokio::spawn({
            let session = session.clone();
            async move { session.load_more().await }
        });
        while !session.is_loading() {
            tokio::task::yield_now().await;
        }

        assert_eq!(session.load_more().await.unwrap(), LoadOutcome::Busy);
        assert_eq!(session.load_more().await.unwrap(), LoadOutcome::Busy);

        gate.notify_one();
        assert_eq!(first.await.unwrap().unwrap(), LoadOutcome::Loaded(2));
        assert!(!session.is_loading());
        assert_eq!(session.source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cursor_and_filters_are_sent_with_each_page() {
        let filters = JobsQuery {
            remote: Some("true".into()),
            cursor: Some("ignored".into()),
            ..JobsQuery::default()
        };
        let session = FeedSession::new(Paged::new(5), filters).page_size(PageSize::new(2).unwrap());

        session.load_more().await.unwrap();
        session.load_more().await.unwrap();

        let queries = session.source.queries.lock().unwrap().clone();
        assert_eq!(queries[0].cursor, None);
        assert_eq!(queries[0].remote.as_deref(), Some("true"));
        assert_eq!(queries[0].limit.as_deref(), Some("2"));
        assert_eq!(queries[1].cursor, Some(id(2).to_string()));
        assert_eq!(queries[1].remote.as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn failed_load_keeps_state_and_can_be_retried() {
        let session = FeedSession::new(Paged::new(5), JobsQuery::default());
        session.load_more().await.unwrap();

        session.source.fail.store(true, Ordering::SeqCst);
        assert!(session.load_more().await.is_err());
        assert!(!session.is_loading());
        assert_eq!(session.len().await, 2);
        assert!(session.has_more().await);

        session.source.fail.store(false, Ordering::SeqCst);
        session.load_more().await.unwrap();
        assert_eq!(ids(&session.jobs().await), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn continues_after_a_prerendered_first_page() {
        let first = JobsPage {
            jobs: vec![posting(1), posting(2)],
            next_cursor: Some(id(2)),
        };
        let session = FeedSession::with_first_page(Paged::new(3), JobsQuery::default(), first);
        assert_eq!(session.load_more().await.unwrap(), LoadOutcome::Loaded(1));
        assert_eq!(ids(&session.jobs().await), vec![1, 2, 3]);
        assert!(!session.has_more().await);
    }

    #[tokio::test]
    async fn prerendered_last_page_is_already_exhausted() {
        let first = JobsPage {
            jobs: vec![posting(1)],
            next_cursor: None,
        };
        let session = FeedSession::with_first_page(Paged::new(1), JobsQuery::default(), first);
        assert_eq!(session.load_more().await.unwrap(), LoadOutcome::Exhausted);
        assert_eq!(session.source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn page_in_flight_during_reset_is_discarded() {
        let gate = Arc::new(Notify::new());
        let source = Paged {
            gate: Some(gate.clone()),
            ..Paged::new(5)
        };
        let session = Arc::new(FeedSession::new(source, JobsQuery::default()));

        let pending = tokio::spawn({
            let session = session.clone();
            async move { session.load_more().await }
        });
        while !session.is_loading() {
            tokio::task::yield_now().await;
        }

        let verified = JobsQuery {
            verified: Some("true".into()),
            ..JobsQuery::default()
        };
        session.reset(verified.clone()).await;
        gate.notify_one();

        assert_eq!(pending.await.unwrap().unwrap(), LoadOutcome::Stale);
        assert_eq!(session.len().await, 0);
        assert!(session.has_more().await);
        assert_eq!(session.filters().await, verified);

        gate.notify_one();
        assert_eq!(session.load_more().await.unwrap(), LoadOutcome::Loaded(2));
        let queries = session.source.queries.lock().unwrap().clone();
        assert_eq!(queries.last().unwrap().cursor, None);
        assert_eq!(queries.last().unwrap().verified.as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn reset_starts_over_with_new_filters() {
        let session = FeedSession::new(Paged::new(5), JobsQuery::default());
        session.load_more().await.unwrap();

        let verified = JobsQuery {
            verified: Some("true".into()),
            ..JobsQuery::default()
        };
        session.reset(verified.clone()).await;
        assert_eq!(session.len().await, 0);
        assert!(session.has_more().await);
        assert_eq!(session.filters().await, verified);

        session.load_more().await.unwrap();
        let queries = session.source.queries.lock().unwrap().clone();
        assert_eq!(queries.last().unwrap().cursor, None);
        assert_eq!(queries.last().unwrap().verified.as_deref(), Some("true"));
    }
}
