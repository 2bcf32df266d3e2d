use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use service::record::Record;

use super::ResourceExtension;
use crate::errors::ApiError;
use crate::state::ServiceState;

pub struct Checkin;

impl ResourceExtension for Checkin {
    fn resource(&self) -> &'static str {
        "checkin"
    }

    fn routes(&self, base: &str) -> Router<ServiceState> {
        Router::new().route(&format!("{base}/:id/boarding-pass"), get(boarding_pass))
    }
}

/// Check-in records are keyed by booking, so the boarding pass is the record itself.
async fn boarding_pass(State(state): State<ServiceState>, Path(booking_id): Path<String>) -> Result<Json<Record>, ApiError> {
    let store = state.store()?;
    store.get_by_id(&booking_id).await.map(Json).ok_or(ApiError::NotFound)
}
