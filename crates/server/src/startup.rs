use axum::Router;
use configs::{AppConfig, ResourceSettings};
use service::storage::RecordStore;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServiceState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Router for `settings` with the store loaded from its snapshot.
pub async fn build_app(settings: ResourceSettings, openapi_file: impl Into<String>) -> Router {
    let store = RecordStore::load(&settings).await;
    let state = ServiceState::with_store(settings, openapi_file, store);
    routes::build_router(state, build_cors())
}

/// Public entry: bind the configured address and serve.
/// Expects `cfg` already validated and logging already initialized.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    serve(cfg, listener).await
}

/// Serve on `listener` right away; the snapshot loads in the background and
/// the store is installed when it is ready.
pub async fn serve(cfg: AppConfig, listener: TcpListener) -> anyhow::Result<()> {
    let settings = cfg.resource.resolve().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let state = ServiceState::new(settings.clone(), cfg.openapi_file.clone());
    let app = routes::build_router(state.clone(), build_cors());

    let addr = listener.local_addr()?;
    info!(service = %settings.name, resource = %settings.path, %addr, event = "listening", "starting service");

    tokio::spawn(async move {
        let store = RecordStore::load(&settings).await;
        let records = store.len().await;
        if state.install(store) {
            info!(service = %settings.name, records, event = "ready", "store installed");
        } else {
            warn!(service = %settings.name, "store already installed");
        }
    });

    axum::serve(listener, app).await?;
    Ok(())
}
