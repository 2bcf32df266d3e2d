use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use service::{record::Record, services::baggage_service};

use super::{object_or_empty, ResourceExtension};
use crate::errors::ApiError;
use crate::routes::body::{decode, JsonBody};
use crate::state::ServiceState;

pub struct Baggage;

impl ResourceExtension for Baggage {
    fn resource(&self) -> &'static str {
        "baggage"
    }

    fn routes(&self, base: &str) -> Router<ServiceState> {
        Router::new()
            .route(&format!("{base}/add"), post(add))
            .route(&format!("{base}/track/:tag"), get(track).put(update_tracking))
            .route(&format!("{base}/booking/:booking_id"), get(by_booking))
    }
}

async fn add(State(state): State<ServiceState>, body: Bytes) -> Result<(StatusCode, Json<Value>), ApiError> {
    let store = state.store()?;
    let input = object_or_empty(&body)?;
    let bags = baggage_service::add_bags(&store, &input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "baggage": bags }))))
}

async fn track(State(state): State<ServiceState>, Path(tag): Path<String>) -> Result<Json<Record>, ApiError> {
    let store = state.store()?;
    store.get_by_id(&tag).await.map(Json).ok_or(ApiError::NotFound)
}

async fn update_tracking(
    State(state): State<ServiceState>,
    Path(tag): Path<String>,
    body: Bytes,
) -> Result<Json<Record>, ApiError> {
    let store = state.store()?;
    let updated = match decode(&body) {
        JsonBody::Object(partial) => store.update(&tag, partial).await,
        JsonBody::Empty => store.get_by_id(&tag).await,
        JsonBody::Invalid => return Err(ApiError::BadRequest("Invalid JSON body".into())),
        JsonBody::NotObject => return Err(ApiError::BadRequest("No data provided".into())),
    };
    updated.map(Json).ok_or(ApiError::NotFound)
}

async fn by_booking(State(state): State<ServiceState>, Path(booking_id): Path<String>) -> Result<Json<Vec<Value>>, ApiError> {
    let store = state.store()?;
    Ok(Json(baggage_service::bags_for_booking(&store, &booking_id).await))
}
