use std::collections::HashMap;
use std::sync::RwLock;

use jobscroll_core::{FeedKey, JobId, JobPosting, Predicate};

use super::r#trait::{JobStore, JobStoreError};

/// In-memory posting store.
///
/// Intended for tests/dev and seeded demo data. Every query is a full scan.
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    postings: RwLock<HashMap<JobId, JobPosting>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_postings(postings: impl IntoIterator<Item = JobPosting>) -> Self {
        Self {
            postings: RwLock::new(postings.into_iter().map(|p| (p.id, p)).collect()),
        }
    }

    /// Load postings, replacing any with the same id.
    ///
    /// This is the ingestion hook for seeds and tests; the feed itself never
    /// writes.
    pub fn load(&self, postings: impl IntoIterator<Item = JobPosting>) -> Result<(), JobStoreError> {
        let mut map = self
            .postings
            .write()
            .map_err(|_| JobStoreError::Backend("lock poisoned".to_string()))?;
        for p in postings {
            map.insert(p.id, p);
        }
        Ok(())
    }

    /// Drop a posting (simulates deletion by the ingestion side).
    pub fn remove(&self, id: JobId) -> Option<JobPosting> {
        self.postings.write().ok()?.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.postings.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<JobId, JobPosting>>, JobStoreError> {
        self.postings
            .read()
            .map_err(|_| JobStoreError::Backend("lock poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl JobStore for InMemoryJobStore {
    async fn feed_key(&self, id: JobId) -> Result<Option<FeedKey>, JobStoreError> {
        Ok(self.read()?.get(&id).map(JobPosting::feed_key))
    }

    async fn find_matching(
        &self,
        predicate: &Predicate,
        after: Option<FeedKey>,
        take: usize,
    ) -> Result<Vec<JobPosting>, JobStoreError> {
        let map = self.read()?;

        let mut matching: Vec<&JobPosting> = map
            .values()
            .filter(|p| predicate.matches(p))
            .filter(|p| after.is_none_or(|cursor| p.feed_key().is_after(&cursor)))
            .collect();
        matching.sort_by(|a, b| a.feed_key().feed_cmp(&b.feed_key()));

        Ok(matching.into_iter().take(take).cloned().collect())
    }

    async fn get(&self, id: JobId) -> Result<Option<JobPosting>, JobStoreError> {
        Ok(self.read()?.get(&id).cloned())
    }
}
