use serde_json::{json, Value};

use crate::errors::ServiceError;
use crate::record::Record;
use crate::storage::RecordStore;

/// Auxiliary snapshot key with the meal catalogue.
pub const MEALS_KEY: &str = "meals";

/// Meal catalogue, `{}` when the snapshot has none.
pub async fn meals(store: &RecordStore) -> Value {
    store.auxiliary(MEALS_KEY).await.unwrap_or_else(|| json!({}))
}

/// Confirmation for a meal preference. Nothing is stored.
pub fn record_meal(booking_id: Option<String>, preference: Option<String>) -> Result<Record, ServiceError> {
    confirmation(booking_id, ("preference", preference), "recorded")
}

/// Confirmation for a seat upgrade. Nothing is stored.
pub fn upgrade_seat(booking_id: Option<String>, new_seat: Option<String>) -> Result<Record, ServiceError> {
    confirmation(booking_id, ("new_seat", new_seat), "upgraded")
}

fn confirmation(
    booking_id: Option<String>,
    (field, value): (&str, Option<String>),
    status: &str,
) -> Result<Record, ServiceError> {
    let (Some(booking_id), Some(value)) = (booking_id.filter(|s| !s.is_empty()), value.filter(|s| !s.is_empty())) else {
        return Err(ServiceError::Validation(format!("booking_id and {field} required")));
    };
    let mut rec = Record::new();
    rec.insert("booking_id".into(), Value::String(booking_id));
    rec.insert(field.into(), Value::String(value));
    rec.insert("status".into(), Value::String(status.into()));
    Ok(rec)
}
