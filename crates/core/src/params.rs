//! URL query parameters of the feed endpoint.
//!
//! `JobsQuery` is the raw, string-typed view of
//! `?search=&location=&remote=&salaryMin=&verified=&levels=&cursor=&limit=`.
//! The server deserializes it from the request, the client serializes it onto
//! outgoing requests, and stored preferences are encoded into it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::DomainResult;
use crate::filter::FilterRequest;
use crate::id::JobId;
use crate::job::ExperienceLevel;
use crate::page::PageSize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

impl JobsQuery {
    /// Decode the filter dimensions.
    ///
    /// Flags are only set by the literal `true`; a non-numeric `salaryMin`
    /// means "no floor". The only failure is an unknown experience level.
    pub fn filter_request(&self) -> DomainResult<FilterRequest> {
        Ok(FilterRequest {
            search: non_empty(&self.search),
            location: non_empty(&self.location),
            remote_only: flag(&self.remote),
            salary_min: self.salary_min.as_deref().and_then(parse_int),
            experience_levels: self.levels.as_deref().map(parse_levels).transpose()?,
            verified_only: flag(&self.verified),
        })
    }

    /// Decode the cursor; an empty value is the same as none.
    pub fn cursor(&self) -> DomainResult<Option<JobId>> {
        match self.cursor.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }

    /// Requested page size; see [`PageSize::clamped`].
    pub fn page_size(&self, fallback: PageSize) -> PageSize {
        PageSize::clamped(self.limit.as_deref().and_then(parse_int), fallback)
    }

    /// Encode a filter request, omitting every unset dimension.
    pub fn from_filter(filter: &FilterRequest) -> Self {
        let levels = filter
            .experience_levels
            .as_ref()
            .filter(|l| !l.is_empty())
            .map(join_levels);

        Self {
            search: filter.search.clone().filter(|s| !s.is_empty()),
            location: filter.location.clone().filter(|s| !s.is_empty()),
            remote: (filter.remote_only == Some(true)).then(|| "true".to_string()),
            salary_min: filter.salary_min.filter(|m| *m != 0).map(|m| m.to_string()),
            verified: (filter.verified_only == Some(true)).then(|| "true".to_string()),
            levels,
            cursor: None,
            limit: None,
        }
    }

    pub fn with_cursor(mut self, cursor: JobId) -> Self {
        self.cursor = Some(cursor.to_string());
        self
    }

    pub fn with_limit(mut self, size: PageSize) -> Self {
        self.limit = Some(size.get().to_string());
        self
    }

    /// True when no filter dimension is present (cursor and limit ignored).
    pub fn has_no_filters(&self) -> bool {
        [
            &self.search,
            &self.location,
            &self.remote,
            &self.salary_min,
            &self.verified,
            &self.levels,
        ]
        .iter()
        .all(|v| v.is_none())
    }

    /// Present parameters as ordered key/value pairs.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("levels", &self.levels),
            ("remote", &self.remote),
            ("salaryMin", &self.salary_min),
            ("search", &self.search),
            ("location", &self.location),
            ("verified", &self.verified),
            ("cursor", &self.cursor),
            ("limit", &self.limit),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.clone().map(|v| (k, v)))
        .collect()
    }
}

fn join_levels(levels: &BTreeSet<ExperienceLevel>) -> String {
    levels
        .iter()
        .map(ExperienceLevel::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_levels(raw: &str) -> DomainResult<BTreeSet<ExperienceLevel>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<ExperienceLevel>)
        .collect()
}

fn non_empty(v: &Option<String>) -> Option<String> {
    v.clone().filter(|s| !s.is_empty())
}

fn flag(v: &Option<String>) -> Option<bool> {
    v.as_ref().map(|s| s == "true")
}

fn parse_int(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}
