//! Job posting read model.
//!
//! Postings are owned by an external ingestion/admin system. This crate only
//! ever reads them, so the model is a plain data record with no lifecycle
//! methods.

use core::cmp::Ordering;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::id::JobId;

/// Seniority bucket a posting is aimed at.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Executive,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 4] = [
        ExperienceLevel::Entry,
        ExperienceLevel::Mid,
        ExperienceLevel::Senior,
        ExperienceLevel::Executive,
    ];

    /// Wire / database spelling (`ENTRY`, `MID`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "ENTRY",
            ExperienceLevel::Mid => "MID",
            ExperienceLevel::Senior => "SENIOR",
            ExperienceLevel::Executive => "EXECUTIVE",
        }
    }
}

impl core::fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExperienceLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ENTRY" => Ok(ExperienceLevel::Entry),
            "MID" => Ok(ExperienceLevel::Mid),
            "SENIOR" => Ok(ExperienceLevel::Senior),
            "EXECUTIVE" => Ok(ExperienceLevel::Executive),
            other => Err(DomainError::validation(format!(
                "unknown experience level `{other}` (expected one of: ENTRY, MID, SENIOR, EXECUTIVE)"
            ))),
        }
    }
}

/// A single job listing as served by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: JobId,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub company_logo: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub salary_min: Option<i64>,
    #[serde(default)]
    pub salary_max: Option<i64>,
    #[serde(default)]
    pub salary_currency: Option<String>,
    #[serde(default)]
    pub salary_period: Option<String>,
    #[serde(default)]
    pub remote: bool,
    #[serde(default)]
    pub apply_url: Option<String>,
    #[serde(default)]
    pub audience_tags: Vec<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default = "default_active")]
    pub active: bool,
    pub posted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl JobPosting {
    /// Minimal active posting; everything optional is left unset.
    pub fn new(
        id: JobId,
        title: impl Into<String>,
        company: impl Into<String>,
        posted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            company: company.into(),
            company_logo: None,
            location: None,
            job_type: None,
            experience_level: None,
            category: String::new(),
            description: String::new(),
            salary_min: None,
            salary_max: None,
            salary_currency: None,
            salary_period: None,
            remote: false,
            apply_url: None,
            audience_tags: Vec::new(),
            verified: false,
            active: true,
            posted_at,
            created_at: posted_at,
        }
    }

    /// Sort key of the feed: `posted_at`, then `id`.
    pub fn feed_key(&self) -> FeedKey {
        FeedKey {
            posted_at: self.posted_at,
            id: self.id,
        }
    }
}

/// Position of a posting in the feed order.
///
/// The feed is sorted newest first; the id breaks ties so that the order is
/// total even when timestamps collide.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FeedKey {
    pub posted_at: DateTime<Utc>,
    pub id: JobId,
}

impl FeedKey {
    /// Compare two keys in feed order (newest first, then highest id first).
    pub fn feed_cmp(&self, other: &FeedKey) -> Ordering {
        other
            .posted_at
            .cmp(&self.posted_at)
            .then_with(|| other.id.cmp(&self.id))
    }

    /// True when `self` comes strictly after `cursor` in feed order.
    pub fn is_after(&self, cursor: &FeedKey) -> bool {
        self.feed_cmp(cursor) == Ordering::Greater
    }
}
