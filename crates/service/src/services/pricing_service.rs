use serde::Serialize;

use crate::record::{as_number, text_field, Record};
use crate::storage::RecordStore;

/// Auxiliary snapshot key with tax tables, e.g. `{"domestic": 50}`.
pub const TAXES_FEES_KEY: &str = "taxes_fees";

pub const DEFAULT_BASE_FARE: f64 = 400.0;
pub const DEFAULT_TAXES: f64 = 50.0;
pub const DEFAULT_TOTAL: f64 = 450.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceQuote {
    pub base_fare: f64,
    pub taxes: f64,
    pub total: f64,
}

/// Fare breakdown for `input.flight_id`.
///
/// Flights without a priced record fall back to the fixed default breakdown,
/// taking only `taxes` from `taxes_fees.domestic`; the default total stays 450.
/// A priced record's `total` is `base_fare + taxes` unless it carries its own.
pub async fn calculate(store: &RecordStore, input: &Record) -> PriceQuote {
    let domestic = store
        .auxiliary(TAXES_FEES_KEY)
        .await
        .and_then(|t| t.get("domestic").and_then(as_number))
        .unwrap_or(DEFAULT_TAXES);

    let priced = match text_field(input, "flight_id") {
        Some(flight_id) => store
            .get_by_id(&flight_id)
            .await
            .filter(|r| r.contains_key("base_fare")),
        None => None,
    };

    match priced {
        Some(rec) => {
            let base_fare = rec.get("base_fare").and_then(as_number).unwrap_or(DEFAULT_BASE_FARE);
            let taxes = rec.get("taxes").and_then(as_number).unwrap_or(domestic);
            let total = rec.get("total").and_then(as_number).unwrap_or(base_fare + taxes);
            PriceQuote { base_fare, taxes, total }
        }
        None => PriceQuote { base_fare: DEFAULT_BASE_FARE, taxes: domestic, total: DEFAULT_TOTAL },
    }
}
