//! `jobscroll-core`: job feed domain types and the filter compiler.
//!
//! This crate contains **pure domain** logic (no infrastructure concerns):
//! the posting model, filter compilation, pagination value types, the feed's
//! query-parameter encoding and client-side preferences.

pub mod error;
pub mod filter;
pub mod id;
pub mod job;
pub mod page;
pub mod params;
pub mod preferences;

pub use error::{DomainError, DomainResult};
pub use filter::{Clause, FilterRequest, Predicate, compile};
pub use id::JobId;
pub use job::{ExperienceLevel, FeedKey, JobPosting};
pub use page::{Page, PageSize};
pub use params::JobsQuery;
pub use preferences::{Intent, UserPreferences, preferences_to_params};
