use axum::{body::Bytes, extract::State, http::StatusCode, routing::post, Json, Router};
use service::services::pricing_service::{self, PriceQuote};

use super::{object_or_empty, ResourceExtension};
use crate::errors::ApiError;
use crate::state::ServiceState;

pub struct Pricing;

impl ResourceExtension for Pricing {
    fn resource(&self) -> &'static str {
        "pricing"
    }

    fn routes(&self, base: &str) -> Router<ServiceState> {
        Router::new().route(&format!("{base}/calculate"), post(calculate))
    }
}

/// Quote for `flight_id`; answers 201 even though nothing is created.
async fn calculate(State(state): State<ServiceState>, body: Bytes) -> Result<(StatusCode, Json<PriceQuote>), ApiError> {
    let store = state.store()?;
    let input = object_or_empty(&body)?;
    Ok((StatusCode::CREATED, Json(pricing_service::calculate(&store, &input).await)))
}
