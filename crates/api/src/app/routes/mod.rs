use axum::{routing::get, Router};

pub mod jobs;
pub mod system;

/// Router for the public feed endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/api/jobs", get(jobs::list_jobs))
        .route("/api/jobs/:id", get(jobs::get_job))
}
