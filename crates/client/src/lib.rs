//! `jobscroll-client`
//!
//! Client side of the job feed:
//! - HTTP access to the feed API
//! - An infinite-scroll session that keeps at most one page request in flight
//! - Local preference storage and the first-visit / return-visit flows
//!
//! The API remains the only source of postings; the client stores nothing but
//! the user's preferences.

pub mod api;
pub mod error;
pub mod intake;
pub mod preferences_store;
pub mod session;

pub use api::{FeedClient, FeedSource, JobsPage};
pub use error::{ClientError, PreferencesStoreError};
pub use intake::{
    IntakeForm, choose_browsing, clear_preferences, complete_intake, dismiss_intake,
    initial_query, needs_intake, save_preferences, skip_intake,
};
pub use preferences_store::{
    FilePreferencesStore, InMemoryPreferencesStore, PREFERENCES_KEY, PreferencesStore,
};
pub use session::{FeedSession, LoadOutcome};
