//! Cursor-based pagination over a [`JobStore`].
//!
//! The cursor is the id of the last posting of the previous page. The pager
//! resolves it to a feed position, asks the store for one posting more than
//! the page size and uses the surplus to decide whether another page exists.

use thiserror::Error;
use tracing::instrument;

use jobscroll_core::{JobId, JobPosting, Page, PageSize, Predicate};

use crate::job_store::{JobStore, JobStoreError};

#[derive(Debug, Error)]
pub enum PageError {
    /// The cursor does not name any posting in the store.
    #[error("cursor {0} does not refer to a known posting")]
    CursorNotFound(JobId),

    #[error(transparent)]
    Store(#[from] JobStoreError),
}

/// Pages through postings matching a predicate, newest first.
#[derive(Debug, Clone)]
pub struct CursorPager<S> {
    store: S,
}

impl<S> CursorPager<S>
where
    S: JobStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// One page of matches strictly after `cursor` (or from the top when
    /// `cursor` is `None`).
    ///
    /// `next_cursor` is the id of the last returned posting when more matches
    /// follow, and absent otherwise.
    #[instrument(skip(self, predicate), fields(page_size = page_size.get()), err)]
    pub async fn page(
        &self,
        predicate: &Predicate,
        cursor: Option<JobId>,
        page_size: PageSize,
    ) -> Result<Page<JobPosting>, PageError> {
        let after = match cursor {
            Some(id) => Some(
                self.store
                    .feed_key(id)
                    .await?
                    .ok_or(PageError::CursorNotFound(id))?,
            ),
            None => None,
        };

        let size = page_size.as_usize();
        let mut items = self.store.find_matching(predicate, after, size + 1).await?;

        let next_cursor = if items.len() > size {
            items.truncate(size);
            items.last().map(|p| p.id)
        } else {
            None
        };

        Ok(Page { items, next_cursor })
    }

    /// Walk every page from the top and concatenate the results.
    ///
    /// Used by tooling and tests; the feed itself loads one page at a time.
    pub async fn collect_all(
        &self,
        predicate: &Predicate,
        page_size: PageSize,
    ) -> Result<Vec<JobPosting>, PageError> {
        let mut all = Vec::new();
        let mut cursor = None;
        loop {
            let page = self.page(predicate, cursor, page_size).await?;
            all.extend(page.items);
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => return Ok(all),
            }
        }
    }
}
