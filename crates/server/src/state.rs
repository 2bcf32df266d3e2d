use std::sync::Arc;

use configs::ResourceSettings;
use service::storage::RecordStore;
use tokio::sync::OnceCell;

use crate::errors::ApiError;

/// Shared axum state for one resource service.
///
/// The store is installed once, after the snapshot has been read; until
/// then every data route answers with `ApiError::NotInitialized`.
#[derive(Clone)]
pub struct ServiceState {
    pub resource: Arc<ResourceSettings>,
    pub openapi_file: Arc<str>,
    store: Arc<OnceCell<Arc<RecordStore>>>,
}

impl ServiceState {
    pub fn new(resource: ResourceSettings, openapi_file: impl Into<String>) -> Self {
        Self {
            resource: Arc::new(resource),
            openapi_file: Arc::from(openapi_file.into()),
            store: Arc::new(OnceCell::new()),
        }
    }

    pub fn with_store(resource: ResourceSettings, openapi_file: impl Into<String>, store: Arc<RecordStore>) -> Self {
        let state = Self::new(resource, openapi_file);
        state.install(store);
        state
    }

    /// Install the store; returns false if one was already installed.
    pub fn install(&self, store: Arc<RecordStore>) -> bool {
        self.store.set(store).is_ok()
    }

    pub fn try_store(&self) -> Option<&Arc<RecordStore>> {
        self.store.get()
    }

    pub fn store(&self) -> Result<Arc<RecordStore>, ApiError> {
        self.store.get().cloned().ok_or(ApiError::NotInitialized)
    }
}
