//! Filter compilation: `FilterRequest` -> store-independent `Predicate`.
//!
//! A predicate is an ordered list of clauses, all of which must hold. It is
//! evaluated directly by in-process stores (`Predicate::matches`) and
//! translated clause by clause into SQL by the Postgres store.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::job::{ExperienceLevel, JobPosting};

/// Structured filter request. Every field is optional; absence means
/// "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    pub search: Option<String>,
    pub location: Option<String>,
    pub remote_only: Option<bool>,
    pub salary_min: Option<i64>,
    pub experience_levels: Option<BTreeSet<ExperienceLevel>>,
    pub verified_only: Option<bool>,
}

/// One condition of a compiled predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// `active = true`. Always present.
    Active,
    /// Case-insensitive substring match on title OR company.
    SearchTitleOrCompany(String),
    /// Case-insensitive substring match on location.
    LocationContains(String),
    /// `remote = true`.
    RemoteOnly,
    /// `salary_max >= floor`; postings without a ceiling never match.
    SalaryCeilingAtLeast(i64),
    /// Experience level is one of the set; postings without a level never match.
    LevelIn(BTreeSet<ExperienceLevel>),
    /// `verified = true`.
    VerifiedOnly,
}

impl Clause {
    pub fn matches(&self, job: &JobPosting) -> bool {
        match self {
            Clause::Active => job.active,
            Clause::SearchTitleOrCompany(needle) => {
                contains_ignore_case(&job.title, needle) || contains_ignore_case(&job.company, needle)
            }
            Clause::LocationContains(needle) => job
                .location
                .as_deref()
                .is_some_and(|loc| contains_ignore_case(loc, needle)),
            Clause::RemoteOnly => job.remote,
            Clause::SalaryCeilingAtLeast(floor) => job.salary_max.is_some_and(|max| max >= *floor),
            Clause::LevelIn(levels) => job
                .experience_level
                .is_some_and(|level| levels.contains(&level)),
            Clause::VerifiedOnly => job.verified,
        }
    }
}

/// Conjunction of clauses describing which postings qualify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    /// Predicate matching every active posting.
    pub fn active_only() -> Self {
        Self {
            clauses: vec![Clause::Active],
        }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn matches(&self, job: &JobPosting) -> bool {
        self.clauses.iter().all(|c| c.matches(job))
    }
}

impl Default for Predicate {
    fn default() -> Self {
        Self::active_only()
    }
}

/// Compile a filter request into a predicate.
///
/// Pure and infallible: numeric coercion is the caller's job. Clause order is
/// fixed (active, search, location, remote, salary, levels, verified) so equal
/// requests always compile to equal predicates.
pub fn compile(request: &FilterRequest) -> Predicate {
    let mut clauses = vec![Clause::Active];

    if let Some(search) = non_empty(request.search.as_deref()) {
        clauses.push(Clause::SearchTitleOrCompany(search.to_string()));
    }

    if let Some(location) = non_empty(request.location.as_deref()) {
        clauses.push(Clause::LocationContains(location.to_string()));
    }

    if request.remote_only == Some(true) {
        clauses.push(Clause::RemoteOnly);
    }

    // Only zero means "no floor"; a negative floor still requires a ceiling.
    if let Some(floor) = request.salary_min.filter(|f| *f != 0) {
        clauses.push(Clause::SalaryCeilingAtLeast(floor));
    }

    if let Some(levels) = request.experience_levels.as_ref().filter(|l| !l.is_empty()) {
        clauses.push(Clause::LevelIn(levels.clone()));
    }

    if request.verified_only == Some(true) {
        clauses.push(Clause::VerifiedOnly);
    }

    Predicate { clauses }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
