use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use jobscroll_core::{JobId, JobsQuery, compile};

use crate::app::{dto, errors, services::AppServices};

/// `GET /api/jobs`: one page of the filtered feed.
pub async fn list_jobs(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<JobsQuery>,
) -> axum::response::Response {
    let filter = match query.filter_request() {
        Ok(f) => f,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let cursor = match query.cursor() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let page_size = query.page_size(services.default_page_size());
    let predicate = compile(&filter);

    match services.page(&predicate, cursor, page_size).await {
        Ok(page) => Json(dto::JobsResponse::from(page)).into_response(),
        Err(e) => errors::page_error_to_response(e),
    }
}

/// `GET /api/jobs/:id`: a single active posting.
pub async fn get_job(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: JobId = match id.parse() {
        Ok(id) => id,
        Err(e) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string());
        }
    };

    match services.job(id).await {
        Ok(Some(job)) if job.active => Json(job).into_response(),
        Ok(_) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "job not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
