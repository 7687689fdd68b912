use std::sync::Arc;

use thiserror::Error;

use jobscroll_core::{FeedKey, JobId, JobPosting, Predicate};

/// Job store operation error.
///
/// These are **infrastructure errors** (connectivity, query failures, rows
/// that can't be decoded) as opposed to domain errors. Callers surface them as
/// a generic service error; nothing is retried.
#[derive(Debug, Error)]
pub enum JobStoreError {
    #[error("store backend failure: {0}")]
    Backend(String),

    #[error("failed to decode posting row: {0}")]
    Decode(String),
}

/// Read-only, filter-sort-paginate view over job postings.
///
/// The store is an oracle: it evaluates a compiled [`Predicate`], orders by
/// feed order (`posted_at DESC, id DESC`) and returns a bounded slice. It
/// knows nothing about cursors or page sizes; that is the pager's job.
///
/// ## Implementation Requirements
///
/// Implementations must:
/// - apply every clause of the predicate (including the active-only clause)
/// - return postings strictly after `after` in feed order, when given
/// - never return more than `take` postings
/// - never mutate the underlying data
#[async_trait::async_trait]
pub trait JobStore: Send + Sync {
    /// Feed position of a posting, whether or not it is active or matches any
    /// predicate. `None` when the id is unknown.
    async fn feed_key(&self, id: JobId) -> Result<Option<FeedKey>, JobStoreError>;

    /// Up to `take` postings matching `predicate`, in feed order, strictly
    /// after `after`.
    async fn find_matching(
        &self,
        predicate: &Predicate,
        after: Option<FeedKey>,
        take: usize,
    ) -> Result<Vec<JobPosting>, JobStoreError>;

    /// A single posting by id (active or not).
    async fn get(&self, id: JobId) -> Result<Option<JobPosting>, JobStoreError>;
}

#[async_trait::async_trait]
impl<S> JobStore for Arc<S>
where
    S: JobStore + ?Sized,
{
    async fn feed_key(&self, id: JobId) -> Result<Option<FeedKey>, JobStoreError> {
        (**self).feed_key(id).await
    }

    async fn find_matching(
        &self,
        predicate: &Predicate,
        after: Option<FeedKey>,
        take: usize,
    ) -> Result<Vec<JobPosting>, JobStoreError> {
        (**self).find_matching(predicate, after, take).await
    }

    async fn get(&self, id: JobId) -> Result<Option<JobPosting>, JobStoreError> {
        (**self).get(id).await
    }
}
