use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use service::{record::Record, services::notification_service};

use super::{object_or_empty, ResourceExtension};
use crate::errors::ApiError;
use crate::state::ServiceState;

pub struct Notifications;

impl ResourceExtension for Notifications {
    fn resource(&self) -> &'static str {
        "notifications"
    }

    fn routes(&self, base: &str) -> Router<ServiceState> {
        Router::new()
            .route(&format!("{base}/send"), post(send))
            .route(&format!("{base}/history/:recipient_id"), get(history))
    }
}

async fn send(State(state): State<ServiceState>, body: Bytes) -> Result<(StatusCode, Json<Record>), ApiError> {
    let store = state.store()?;
    let input = object_or_empty(&body)?;
    Ok((StatusCode::CREATED, Json(notification_service::send(&store, &input).await)))
}

async fn history(
    State(state): State<ServiceState>,
    Path(recipient_id): Path<String>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let store = state.store()?;
    Ok(Json(notification_service::history(&store, &recipient_id).await))
}
