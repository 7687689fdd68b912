//! Demo data for the in-memory store.

use std::path::Path;

use anyhow::Context;

use jobscroll_core::JobPosting;

use crate::job_store::InMemoryJobStore;

/// Parse a JSON array of postings (the serialized `JobPosting` shape).
pub fn parse_postings(raw: &str) -> anyhow::Result<Vec<JobPosting>> {
    serde_json::from_str(raw).context("seed data must be a JSON array of job postings")
}

/// Load a seed file into `store`, returning how many postings were read.
pub fn load_seed_file(store: &InMemoryJobStore, path: &Path) -> anyhow::Result<usize> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file at {:?}", path))?;
    let postings = parse_postings(&raw).with_context(|| format!("in seed file {:?}", path))?;
    let count = postings.len();
    store.load(postings).context("failed to load seed postings")?;
    tracing::info!(count, path = %path.display(), "seeded in-memory job store");
    Ok(count)
}
