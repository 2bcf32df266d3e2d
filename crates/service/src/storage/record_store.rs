use std::{collections::HashMap, sync::Arc};

use configs::ResourceSettings;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::record::{self, Record};
use crate::storage::id_policy::IdPolicy;
use crate::storage::snapshot::Snapshot;

/// Everything a store guards with its lock: the record collection and the
/// rest of the snapshot document.
#[derive(Debug, Default, Clone)]
pub struct StoreData {
    pub records: HashMap<String, Record>,
    pub raw: Map<String, Value>,
}

/// In-memory record collection for one resource type.
///
/// Loaded once from a JSON snapshot and never written back. Cloning is cheap
/// and shares the same underlying data.
#[derive(Clone)]
pub struct RecordStore {
    inner: Arc<RwLock<StoreData>>,
    id_field: String,
    id_policy: IdPolicy,
}

impl RecordStore {
    pub fn new(id_field: impl Into<String>, id_policy: IdPolicy) -> Self {
        Self::from_snapshot(Snapshot::empty(), id_field, id_policy)
    }

    pub fn from_snapshot(snapshot: Snapshot, id_field: impl Into<String>, id_policy: IdPolicy) -> Self {
        let data = StoreData { records: snapshot.records, raw: snapshot.raw };
        Self { inner: Arc::new(RwLock::new(data)), id_field: id_field.into(), id_policy }
    }

    /// Build the store for `settings`, starting empty when the snapshot is
    /// missing or unreadable.
    pub async fn load(settings: &ResourceSettings) -> Arc<Self> {
        let policy = IdPolicy::from_settings(settings);
        let snapshot = match Snapshot::load(&settings.data_file, &settings.collection_key).await {
            Ok(s) => {
                info!(
                    data_file = %settings.data_file,
                    collection = s.collection_key.as_deref().unwrap_or("<none>"),
                    records = s.records.len(),
                    "loaded snapshot"
                );
                s
            }
            Err(e) if e.is_missing_file() => {
                warn!(data_file = %settings.data_file, "data file not found, starting empty");
                Snapshot::empty()
            }
            Err(e) => {
                error!(data_file = %settings.data_file, error = %e, "error loading data, starting empty");
                Snapshot::empty()
            }
        };
        Arc::new(Self::from_snapshot(snapshot, settings.id_field.clone(), policy))
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Copy of the whole collection keyed by identifier.
    pub async fn get_all(&self) -> HashMap<String, Record> {
        self.inner.read().await.records.clone()
    }

    /// All records, order unspecified.
    pub async fn list(&self) -> Vec<Record> {
        self.get_all().await.into_values().collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Option<Record> {
        self.inner.read().await.records.get(id).cloned()
    }

    /// Insert `record`, assigning an identifier from the policy when it has none.
    /// An existing record under the same identifier is replaced.
    pub async fn create(&self, mut record: Record) -> Record {
        let mut data = self.inner.write().await;
        let id = match record::identifier(&record, &self.id_field) {
            Some(id) => id,
            None => {
                let id = self.id_policy.generate(|candidate| data.records.contains_key(candidate));
                record.insert(self.id_field.clone(), Value::String(id.clone()));
                id
            }
        };
        data.records.insert(id.clone(), record.clone());
        info!(%id, "created record");
        record
    }

    /// Shallow-merge `partial` into the record at `id`; `None` when absent.
    /// The record stays keyed by `id` even if `partial` rewrites its identifier field.
    pub async fn update(&self, id: &str, partial: Record) -> Option<Record> {
        let mut data = self.inner.write().await;
        let existing = data.records.get_mut(id)?;
        record::merge(existing, partial);
        info!(%id, "updated record");
        Some(existing.clone())
    }

    pub async fn delete(&self, id: &str) -> bool {
        let removed = self.inner.write().await.records.remove(id).is_some();
        if removed {
            info!(%id, "deleted record");
        }
        removed
    }

    /// Records matching every filter field they carry.
    pub async fn search(&self, filters: &Map<String, Value>) -> Vec<Record> {
        let data = self.inner.read().await;
        data.records
            .values()
            .filter(|r| record::matches_filters(r, filters))
            .cloned()
            .collect()
    }

    /// First record (in no particular order) satisfying `pred`.
    pub async fn find_first<F>(&self, pred: F) -> Option<Record>
    where
        F: Fn(&Record) -> bool,
    {
        let data = self.inner.read().await;
        data.records.values().find(|r| pred(r)).cloned()
    }

    /// Clone of an auxiliary top-level snapshot entry.
    pub async fn auxiliary(&self, key: &str) -> Option<Value> {
        self.inner.read().await.raw.get(key).cloned()
    }

    /// Run `f` over a read-locked view of the collection and auxiliary document.
    pub async fn read_map<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&StoreData) -> T,
    {
        let data = self.inner.read().await;
        f(&data)
    }

    /// Run `f` over the collection and auxiliary document under one write lock.
    pub async fn update_map<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut StoreData) -> T,
    {
        let mut data = self.inner.write().await;
        f(&mut data)
    }
}
