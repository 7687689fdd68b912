//! Read-only job posting store boundary.
//!
//! This module defines the infrastructure-facing abstraction the feed queries
//! through, plus its in-memory and Postgres implementations.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryJobStore;
pub use postgres::PostgresJobStore;
pub use r#trait::{JobStore, JobStoreError};
