#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use configs::ResourceSettings;
use serde_json::Value;
use server::routes;
use server::state::ServiceState;
use service::storage::{IdPolicy, RecordStore, Snapshot};
use tower::Service;

pub fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

pub fn state_for(path: &str, doc: Value) -> anyhow::Result<ServiceState> {
    let settings = ResourceSettings::profile(path);
    let snapshot = Snapshot::from_document(doc, &settings.collection_key)?;
    let store = RecordStore::from_snapshot(snapshot, settings.id_field.clone(), IdPolicy::from_settings(&settings));
    Ok(ServiceState::with_store(settings, "/nonexistent/openapi.yaml", Arc::new(store)))
}

pub fn app_for(path: &str, doc: Value) -> anyhow::Result<Router> {
    Ok(routes::build_router(state_for(path, doc)?, cors()))
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&v)?)
        }
        None => Body::empty(),
    };
    send_raw(app, builder.body(body)?).await
}

pub async fn send_raw(app: &Router, req: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let resp = app.clone().call(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, json))
}
