//! HTTP API: router, handlers and request/response mapping for the job feed.

pub mod app;
