//! First-visit intake and return-visit preference flows.
//!
//! Each flow records preferences through a [`PreferencesStore`] and hands back
//! the feed query the UI should navigate to. Nothing here talks to the API.

use jobscroll_core::{ExperienceLevel, Intent, JobsQuery, UserPreferences, preferences_to_params};

use crate::error::PreferencesStoreError;
use crate::preferences_store::PreferencesStore;

/// The intake is shown until any record exists, even an unreadable one.
pub fn needs_intake(store: &dyn PreferencesStore) -> bool {
    !store.has_record()
}

/// Query for the first render.
///
/// Stored preferences only apply when the visitor arrived with no query
/// parameters at all; an explicit URL always wins.
pub fn initial_query(url: &JobsQuery, store: &dyn PreferencesStore) -> JobsQuery {
    if !url.pairs().is_empty() {
        return url.clone();
    }
    match store.load() {
        Some(prefs) => preferences_to_params(&prefs),
        None => JobsQuery::default(),
    }
}

/// Intake closed without an answer. Records "browsing" so it is not shown
/// again; an existing record is left alone.
pub fn dismiss_intake(store: &dyn PreferencesStore) -> Result<(), PreferencesStoreError> {
    if store.has_record() {
        return Ok(());
    }
    store.save(&UserPreferences::browsing())
}

/// "Just browsing" was picked.
pub fn choose_browsing(store: &dyn PreferencesStore) -> Result<(), PreferencesStoreError> {
    store.save(&UserPreferences::browsing())
}

/// "Actively looking" was picked but the preference step was skipped.
pub fn skip_intake(store: &dyn PreferencesStore) -> Result<(), PreferencesStoreError> {
    store.save(&UserPreferences::looking())
}

/// Intake finished with preferences; returns the query to apply.
pub fn complete_intake(
    store: &dyn PreferencesStore,
    form: IntakeForm,
) -> Result<JobsQuery, PreferencesStoreError> {
    save_preferences(store, &form.into_preferences(Intent::Looking))
}

/// Save edited preferences (settings dialog) and return the matching query.
pub fn save_preferences(
    store: &dyn PreferencesStore,
    prefs: &UserPreferences,
) -> Result<JobsQuery, PreferencesStoreError> {
    store.save(prefs)?;
    Ok(preferences_to_params(prefs))
}

/// Forget the stored preferences; the feed goes back to unfiltered.
pub fn clear_preferences(store: &dyn PreferencesStore) -> Result<JobsQuery, PreferencesStoreError> {
    store.clear()?;
    Ok(JobsQuery::default())
}

/// Raw state of the preference form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntakeForm {
    pub levels: Vec<ExperienceLevel>,
    pub remote: bool,
    /// As typed or selected; blank means no floor.
    pub salary_min: String,
    pub search: String,
}

impl IntakeForm {
    /// Form pre-filled from stored preferences (or empty).
    pub fn from_preferences(prefs: Option<&UserPreferences>) -> Self {
        match prefs {
            Some(p) => Self {
                levels: p.levels.clone(),
                remote: p.remote,
                salary_min: p.salary_min.filter(|m| *m != 0).map(|m| m.to_string()).unwrap_or_default(),
                search: p.search.clone(),
            },
            None => Self::default(),
        }
    }

    /// Select or deselect a level, keeping selection order.
    pub fn toggle_level(&mut self, level: ExperienceLevel) {
        if let Some(pos) = self.levels.iter().position(|l| *l == level) {
            self.levels.remove(pos);
        } else {
            self.levels.push(level);
        }
    }

    pub fn into_preferences(self, intent: Intent) -> UserPreferences {
        UserPreferences {
            intent,
            levels: self.levels,
            remote: self.remote,
            salary_min: self.salary_min.trim().parse().ok(),
            search: self.search,
        }
    }
}
