use serde_json::{json, Map, Value};
use tracing::info;

use crate::errors::ServiceError;
use crate::record::{as_number, text_field, Record};
use crate::storage::RecordStore;

/// Auxiliary snapshot key holding `booking_id -> [bag records]`.
pub const BOOKING_INDEX_KEY: &str = "baggage/booking";

const DEFAULT_WEIGHT: i64 = 20;
const DEFAULT_LOCATION: &str = "JFK";
/// Upper bound on bags checked in by one request.
pub const MAX_BAGS: usize = 100;

/// Check `bags` (default 1) new bags in for `input.booking_id`.
///
/// Each bag is tagged `BT{booking_id}-{n}` where `n` follows the collection
/// size, stored in the collection and appended to the booking index.
pub async fn add_bags(store: &RecordStore, input: &Record) -> Result<Vec<Record>, ServiceError> {
    let booking_id = text_field(input, "booking_id")
        .ok_or_else(|| ServiceError::Validation("booking_id required".into()))?;
    let bags = bag_count(input.get("bags"))?;
    let weight = input.get("weight").cloned().unwrap_or_else(|| json!(DEFAULT_WEIGHT));
    let location = input.get("location").cloned().unwrap_or_else(|| json!(DEFAULT_LOCATION));
    let id_field = store.id_field().to_string();

    let created = store
        .update_map(|data| {
            let mut created = Vec::new();
            for _ in 0..bags {
                let mut n = data.records.len() + 1;
                let mut tag = format!("BT{booking_id}-{n}");
                while data.records.contains_key(&tag) {
                    n += 1;
                    tag = format!("BT{booking_id}-{n}");
                }
                let mut rec = Record::new();
                rec.insert(id_field.clone(), Value::String(tag.clone()));
                rec.insert("booking_id".into(), Value::String(booking_id.clone()));
                rec.insert("weight".into(), weight.clone());
                rec.insert("status".into(), json!("checked"));
                rec.insert("location".into(), location.clone());
                data.records.insert(tag, rec.clone());
                created.push(rec);
            }

            let index = data
                .raw
                .entry(BOOKING_INDEX_KEY)
                .or_insert_with(|| Value::Object(Map::new()));
            if !index.is_object() {
                *index = Value::Object(Map::new());
            }
            if let Value::Object(index) = index {
                let entry = index.entry(booking_id.clone()).or_insert_with(|| Value::Array(Vec::new()));
                if !entry.is_array() {
                    *entry = Value::Array(Vec::new());
                }
                if let Value::Array(list) = entry {
                    list.extend(created.iter().cloned().map(Value::Object));
                }
            }
            created
        })
        .await;

    info!(%booking_id, bags = created.len(), "checked baggage");
    Ok(created)
}

/// Bags indexed under `booking_id`; entries still in the collection are
/// returned in their current state.
pub async fn bags_for_booking(store: &RecordStore, booking_id: &str) -> Vec<Value> {
    let id_field = store.id_field().to_string();
    store
        .read_map(|data| {
            let Some(Value::Array(entries)) = data
                .raw
                .get(BOOKING_INDEX_KEY)
                .and_then(|index| index.get(booking_id))
            else {
                return Vec::new();
            };
            entries
                .iter()
                .map(|entry| {
                    entry
                        .as_object()
                        .and_then(|e| text_field(e, &id_field))
                        .and_then(|tag| data.records.get(&tag))
                        .map(|current| Value::Object(current.clone()))
                        .unwrap_or_else(|| entry.clone())
                })
                .collect()
        })
        .await
}

fn bag_count(value: Option<&Value>) -> Result<usize, ServiceError> {
    match value {
        None | Some(Value::Null) => Ok(1),
        Some(v) => as_number(v)
            .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= MAX_BAGS as f64)
            .map(|n| n as usize)
            .ok_or_else(|| ServiceError::Validation(format!("bags must be an integer between 0 and {MAX_BAGS}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::IdPolicy;

    fn rec(v: Value) -> Record {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn add_bags_tags_with_running_count_and_indexes() -> Result<(), ServiceError> {
        let store = RecordStore::new("bag_tag", IdPolicy::Uuid);
        store.create(rec(json!({"bag_tag": "BT000001-1", "booking_id": "BK000001"}))).await;

        let bags = add_bags(&store, &rec(json!({"booking_id": "BK100001", "bags": 2}))).await?;
        let tags: Vec<&str> = bags.iter().map(|b| b["bag_tag"].as_str().unwrap()).collect();
        assert_eq!(tags, vec!["BTBK100001-2", "BTBK100001-3"]);
        assert_eq!(bags[0]["weight"], 20);
        assert_eq!(bags[0]["location"], "JFK");
        assert_eq!(bags[0]["status"], "checked");
        assert_eq!(store.len().await, 3);

        let indexed = bags_for_booking(&store, "BK100001").await;
        assert_eq!(indexed.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn add_bags_requires_booking_id_and_sane_count() {
        let store = RecordStore::new("bag_tag", IdPolicy::Uuid);
        assert!(matches!(add_bags(&store, &rec(json!({"bags": 1}))).await, Err(ServiceError::Validation(_))));
        assert!(matches!(
            add_bags(&store, &rec(json!({"booking_id": "BK1", "bags": -1}))).await,
            Err(ServiceError::Validation(_))
        ));
        let one = add_bags(&store, &rec(json!({"booking_id": "BK1", "bags": "1"}))).await.unwrap();
        assert_eq!(one.len(), 1);
    }

    #[tokio::test]
    async fn add_bags_rejects_counts_above_limit() -> Result<(), ServiceError> {
        let store = RecordStore::new("bag_tag", IdPolicy::Uuid);
        for bags in [json!(1e18), json!(1e15), json!(MAX_BAGS + 1)] {
            assert!(matches!(
                add_bags(&store, &rec(json!({"booking_id": "BK1", "bags": bags}))).await,
                Err(ServiceError::Validation(_))
            ));
        }
        assert!(store.is_empty().await);
        let max = add_bags(&store, &rec(json!({"booking_id": "BK1", "bags": MAX_BAGS}))).await?;
        assert_eq!(max.len(), MAX_BAGS);
        Ok(())
    }

    #[tokio::test]
    async fn booking_index_reflects_later_updates() -> Result<(), ServiceError> {
        let store = RecordStore::new("bag_tag", IdPolicy::Uuid);
        let bags = add_bags(&store, &rec(json!({"booking_id": "BK7"}))).await?;
        let tag = bags[0]["bag_tag"].as_str().unwrap().to_string();
        store.update(&tag, rec(json!({"status": "loaded"}))).await;
        let indexed = bags_for_booking(&store, "BK7").await;
        assert_eq!(indexed[0]["status"], "loaded");
        assert!(bags_for_booking(&store, "BK8").await.is_empty());
        Ok(())
    }
}
