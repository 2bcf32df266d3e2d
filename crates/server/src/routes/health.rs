use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use common::types::Health;
use tracing::debug;
use utoipa::OpenApi;

use crate::errors::ApiError;
use crate::openapi::ApiDoc;
use crate::state::ServiceState;

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health(State(state): State<ServiceState>) -> Json<Health> {
    let records = match state.try_store() {
        Some(store) => store.len().await,
        None => 0,
    };
    Json(Health::healthy(records))
}

/// Serve the configured OpenAPI file, falling back to the generated document.
pub async fn openapi(State(state): State<ServiceState>) -> Result<Response, ApiError> {
    let yaml = match tokio::fs::read_to_string(&*state.openapi_file).await {
        Ok(contents) => contents,
        Err(e) => {
            debug!(file = %state.openapi_file, error = %e, "openapi file unavailable, serving generated document");
            ApiDoc::openapi()
                .to_yaml()
                .map_err(|e| ApiError::Internal(e.to_string()))?
        }
    };
    Ok(([(header::CONTENT_TYPE, "application/x-yaml")], yaml).into_response())
}
