use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use jobscroll_core::DomainError;
use jobscroll_infra::{JobStoreError, PageError};

/// Message shown for any backend failure; details only go to the logs.
pub const STORE_FAILURE_MESSAGE: &str = "Failed to fetch jobs";

pub fn page_error_to_response(err: PageError) -> axum::response::Response {
    match err {
        PageError::CursorNotFound(id) => json_error(
            StatusCode::NOT_FOUND,
            "cursor_not_found",
            format!("cursor {id} does not refer to a known job"),
        ),
        PageError::Store(e) => store_error_to_response(e),
    }
}

pub fn store_error_to_response(err: JobStoreError) -> axum::response::Response {
    tracing::error!(error = %err, "job store query failed");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "store_error",
        STORE_FAILURE_MESSAGE,
    )
}

/// Request-decoding failures. An unparseable cursor gets its own code.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_cursor", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
