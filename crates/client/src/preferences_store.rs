//! Local persistence for [`UserPreferences`].
//!
//! A single JSON record lives under [`PREFERENCES_KEY`]. There is no
//! versioning: a record that no longer decodes is treated as absent, which
//! sends the user back through the intake flow.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::Context;

use jobscroll_core::UserPreferences;

use crate::error::PreferencesStoreError;

/// Storage key (and file stem) of the preferences record.
pub const PREFERENCES_KEY: &str = "jobscroll_preferences";

pub trait PreferencesStore: Send + Sync {
    /// Stored preferences, or `None` when nothing (readable) is stored.
    fn load(&self) -> Option<UserPreferences>;

    fn save(&self, prefs: &UserPreferences) -> Result<(), PreferencesStoreError>;

    fn clear(&self) -> Result<(), PreferencesStoreError>;

    /// Whether any record exists, readable or not.
    fn has_record(&self) -> bool;
}

impl<S> PreferencesStore for std::sync::Arc<S>
where
    S: PreferencesStore + ?Sized,
{
    fn load(&self) -> Option<UserPreferences> {
        (**self).load()
    }

    fn save(&self, prefs: &UserPreferences) -> Result<(), PreferencesStoreError> {
        (**self).save(prefs)
    }

    fn clear(&self) -> Result<(), PreferencesStoreError> {
        (**self).clear()
    }

    fn has_record(&self) -> bool {
        (**self).has_record()
    }
}

fn decode_record(raw: &str, source: &str) -> Option<UserPreferences> {
    let prefs = UserPreferences::decode(raw);
    if prefs.is_none() {
        tracing::warn!(source, "ignoring malformed preferences record");
    }
    prefs
}

/// Preferences stored as `<dir>/jobscroll_preferences.json`.
#[derive(Debug, Clone)]
pub struct FilePreferencesStore {
    path: PathBuf,
}

impl FilePreferencesStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{PREFERENCES_KEY}.json")),
        }
    }

    /// Store under the OS app data directory (`<data_dir>/jobscroll`).
    pub fn default_location() -> anyhow::Result<Self> {
        Ok(Self::new(default_dir()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferencesStore for FilePreferencesStore {
    fn load(&self) -> Option<UserPreferences> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => decode_record(&raw, &self.path.to_string_lossy()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read preferences");
                None
            }
        }
    }

    fn save(&self, prefs: &UserPreferences) -> Result<(), PreferencesStoreError> {
        let raw = prefs.encode()?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Write-then-rename so a crash never leaves a half-written record.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, raw)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), PreferencesStoreError> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn has_record(&self) -> bool {
        self.path.exists()
    }
}

fn default_dir() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    Ok(base.join("jobscroll"))
}

/// Preferences kept in process memory as the encoded record (tests, embedding).
#[derive(Debug, Default)]
pub struct InMemoryPreferencesStore {
    raw: RwLock<Option<String>>,
}

impl InMemoryPreferencesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with an arbitrary raw record, e.g. one written by an older client.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: RwLock::new(Some(raw.into())),
        }
    }

    fn write(&self, value: Option<String>) -> Result<(), PreferencesStoreError> {
        let mut slot = self
            .raw
            .write()
            .map_err(|_| PreferencesStoreError::Unavailable("lock poisoned".to_string()))?;
        *slot = value;
        Ok(())
    }
}

impl PreferencesStore for InMemoryPreferencesStore {
    fn load(&self) -> Option<UserPreferences> {
        let slot = self.raw.read().ok()?;
        decode_record(slot.as_deref()?, "memory")
    }

    fn save(&self, prefs: &UserPreferences) -> Result<(), PreferencesStoreError> {
        self.write(Some(prefs.encode()?))
    }

    fn clear(&self) -> Result<(), PreferencesStoreError> {
        self.write(None)
    }

    fn has_record(&self) -> bool {
        self.raw.read().map(|slot| slot.is_some()).unwrap_or(false)
    }
}
