use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use service::{record::Record, services::loyalty_service};

use super::ResourceExtension;
use crate::errors::ApiError;
use crate::state::ServiceState;

pub struct Loyalty;

impl ResourceExtension for Loyalty {
    fn resource(&self) -> &'static str {
        "loyalty"
    }

    fn routes(&self, base: &str) -> Router<ServiceState> {
        Router::new()
            .route(&format!("{base}/passenger/:passenger_id"), get(by_passenger))
            .route(&format!("{base}/member/:member_id"), get(by_member))
    }
}

async fn by_passenger(
    State(state): State<ServiceState>,
    Path(passenger_id): Path<String>,
) -> Result<Json<Record>, ApiError> {
    let store = state.store()?;
    loyalty_service::find_by_passenger(&store, &passenger_id)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn by_member(State(state): State<ServiceState>, Path(member_id): Path<String>) -> Result<Json<Record>, ApiError> {
    let store = state.store()?;
    loyalty_service::find_by_member(&store, &member_id)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound)
}
