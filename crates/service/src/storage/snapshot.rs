use std::{collections::HashMap, path::Path};

use serde_json::{Map, Value};
use tokio::fs;
use tracing::warn;

use crate::errors::ServiceError;
use crate::record::Record;

/// Decoded startup document: the primary record collection plus the full
/// top-level document (auxiliary lookup data included), as read.
#[derive(Debug, Default, Clone)]
pub struct Snapshot {
    pub records: HashMap<String, Record>,
    pub raw: Map<String, Value>,
    /// Top-level key the collection was taken from, if any.
    pub collection_key: Option<String>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read and split the snapshot file at `path`.
    pub async fn load<P: AsRef<Path>>(path: P, preferred_key: &str) -> Result<Self, ServiceError> {
        let bytes = fs::read(path.as_ref()).await?;
        let doc: Value = serde_json::from_slice(&bytes)?;
        Self::from_document(doc, preferred_key)
    }

    /// Pick `preferred_key` when it holds an object, otherwise the first
    /// object-valued top-level key in document order.
    pub fn from_document(doc: Value, preferred_key: &str) -> Result<Self, ServiceError> {
        let Value::Object(raw) = doc else {
            return Err(ServiceError::Snapshot("top-level JSON value is not an object".into()));
        };

        let key = if raw.get(preferred_key).is_some_and(Value::is_object) {
            Some(preferred_key.to_string())
        } else {
            let fallback = raw.iter().find(|(_, v)| v.is_object()).map(|(k, _)| k.clone());
            if let Some(k) = &fallback {
                warn!(preferred_key, fallback = %k, "collection key missing from snapshot; using first object-valued key");
            }
            fallback
        };

        let mut records = HashMap::new();
        if let Some(Value::Object(collection)) = key.as_deref().and_then(|k| raw.get(k)).cloned() {
            for (id, value) in collection {
                match value {
                    Value::Object(record) => {
                        records.insert(id, record);
                    }
                    _ => warn!(%id, "skipping non-object entry in snapshot collection"),
                }
            }
        }

        Ok(Self { records, raw, collection_key: key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn preferred_key_wins_over_document_order() -> Result<(), ServiceError> {
        let doc = json!({
            "templates": {"booking_confirmed": {"subject": "Booked"}},
            "notifications": {"N1": {"notification_id": "N1"}}
        });
        let snap = Snapshot::from_document(doc, "notifications")?;
        assert_eq!(snap.collection_key.as_deref(), Some("notifications"));
        assert!(snap.records.contains_key("N1"));
        assert!(snap.raw.contains_key("templates"));
        assert_eq!(snap.raw.get("notifications"), Some(&json!({"N1": {"notification_id": "N1"}})));
        Ok(())
    }

    #[test]
    fn falls_back_to_first_object_key_in_document_order() -> Result<(), ServiceError> {
        let doc = json!({
            "version": 2,
            "pricing": {"FL100": {"base_fare": 300}},
            "taxes_fees": {"domestic": 40}
        });
        let snap = Snapshot::from_document(doc, "missing")?;
        assert_eq!(snap.collection_key.as_deref(), Some("pricing"));
        assert_eq!(snap.records.len(), 1);
        assert_eq!(snap.raw.get("taxes_fees"), Some(&json!({"domestic": 40})));
        assert_eq!(snap.raw.get("version"), Some(&json!(2)));
        Ok(())
    }

    #[test]
    fn non_object_document_is_rejected() {
        assert!(matches!(Snapshot::from_document(json!([1, 2]), "x"), Err(ServiceError::Snapshot(_))));
    }

    #[test]
    fn document_without_object_keys_yields_empty_collection() -> Result<(), ServiceError> {
        let snap = Snapshot::from_document(json!({"count": 0}), "flights")?;
        assert!(snap.records.is_empty());
        assert_eq!(snap.collection_key, None);
        Ok(())
    }

    #[tokio::test]
    async fn load_reports_missing_file() {
        let tmp = std::env::temp_dir().join(format!("snapshot_missing_{}.json", uuid::Uuid::new_v4()));
        let err = Snapshot::load(&tmp, "flights").await.unwrap_err();
        assert!(err.is_missing_file());
    }

    #[tokio::test]
    async fn load_reads_file_from_disk() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("snapshot_{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&tmp, br#"{"flights": {"FL1": {"flight_id": "FL1"}}}"#).await?;
        let snap = Snapshot::load(&tmp, "flights").await?;
        assert_eq!(snap.records.len(), 1);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
