use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, Json};

use crate::app::dto::HealthResponse;
use crate::app::{errors, services::AppServices};

pub async fn health(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.ping().await {
        Ok(()) => Json(HealthResponse { status: "ok" }).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
