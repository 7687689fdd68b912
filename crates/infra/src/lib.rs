//! Infrastructure layer: posting stores, pagination, config and seeding.

pub mod config;
pub mod job_store;
pub mod pager;
pub mod seed;

pub use config::{ConfigError, Settings, StoreSettings};
pub use job_store::{InMemoryJobStore, JobStore, JobStoreError, PostgresJobStore};
pub use pager::{CursorPager, PageError};
