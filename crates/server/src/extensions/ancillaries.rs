use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use service::{
    record::{text_field, Record},
    services::ancillary_service,
};

use super::{object_or_empty, ResourceExtension};
use crate::errors::ApiError;
use crate::state::ServiceState;

pub struct Ancillaries;

impl ResourceExtension for Ancillaries {
    fn resource(&self) -> &'static str {
        "ancillaries"
    }

    fn routes(&self, base: &str) -> Router<ServiceState> {
        Router::new()
            .route(&format!("{base}/meals"), get(meals))
            .route(&format!("{base}/meal"), post(meal))
            .route(&format!("{base}/seat-upgrade"), post(seat_upgrade))
    }
}

/// Meal fields come from the body first, then the query string.
fn field(body: &Record, query: &HashMap<String, String>, name: &str) -> Option<String> {
    text_field(body, name).or_else(|| query.get(name).filter(|v| !v.is_empty()).cloned())
}

async fn meals(State(state): State<ServiceState>) -> Result<Json<Value>, ApiError> {
    let store = state.store()?;
    Ok(Json(ancillary_service::meals(&store).await))
}

async fn meal(
    State(state): State<ServiceState>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    state.store()?;
    let input = object_or_empty(&body)?;
    let confirmation = ancillary_service::record_meal(
        field(&input, &query, "booking_id"),
        field(&input, &query, "preference"),
    )?;
    Ok((StatusCode::CREATED, Json(confirmation)))
}

async fn seat_upgrade(State(state): State<ServiceState>, body: Bytes) -> Result<(StatusCode, Json<Record>), ApiError> {
    state.store()?;
    let input = object_or_empty(&body)?;
    let confirmation =
        ancillary_service::upgrade_seat(text_field(&input, "booking_id"), text_field(&input, "new_seat"))?;
    Ok((StatusCode::CREATED, Json(confirmation)))
}
