//! Client-side feed preferences.
//!
//! Preferences only ever pre-populate a feed request on a return visit; the
//! server never sees them. Loading and saving is done by an adapter outside
//! this crate.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::filter::FilterRequest;
use crate::job::ExperienceLevel;
use crate::params::JobsQuery;

/// Why the user is here.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Browsing,
    Looking,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub intent: Intent,
    pub levels: Vec<ExperienceLevel>,
    pub remote: bool,
    pub salary_min: Option<i64>,
    pub search: String,
}

impl UserPreferences {
    /// What gets recorded when the user dismisses the intake or picks
    /// "just browsing": no filters at all.
    pub fn browsing() -> Self {
        Self {
            intent: Intent::Browsing,
            levels: Vec::new(),
            remote: false,
            salary_min: None,
            search: String::new(),
        }
    }

    /// Empty "looking" preferences, filled in by the intake form.
    pub fn looking() -> Self {
        Self {
            intent: Intent::Looking,
            ..Self::browsing()
        }
    }

    /// Decode a persisted record. Anything malformed is treated as absent.
    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Filter request these preferences stand for.
    pub fn to_filter(&self) -> FilterRequest {
        let search = self.search.trim();
        FilterRequest {
            search: (!search.is_empty()).then(|| search.to_string()),
            location: None,
            remote_only: self.remote.then_some(true),
            salary_min: self.salary_min.filter(|m| *m != 0),
            experience_levels: (!self.levels.is_empty())
                .then(|| self.levels.iter().copied().collect()),
            verified_only: None,
        }
    }
}

/// Encode preferences as feed query parameters.
///
/// A field at its unset value (empty list, `false`, `None`/zero, blank search)
/// is omitted; search text is trimmed.
pub fn preferences_to_params(prefs: &UserPreferences) -> JobsQuery {
    let search = prefs.search.trim();
    JobsQuery {
        levels: (!prefs.levels.is_empty())
            .then(|| join_levels_in_order(&prefs.levels)),
        remote: prefs.remote.then(|| "true".to_string()),
        salary_min: prefs
            .salary_min
            .filter(|m| *m != 0)
            .map(|m| m.to_string()),
        search: (!search.is_empty()).then(|| search.to_string()),
        ..JobsQuery::default()
    }
}

// Stored order is preserved; duplicates are dropped.
fn join_levels_in_order(levels: &[ExperienceLevel]) -> String {
    let mut seen = BTreeSet::new();
    levels
        .iter()
        .filter(|l| seen.insert(**l))
        .map(ExperienceLevel::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
