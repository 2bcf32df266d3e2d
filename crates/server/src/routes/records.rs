//! Generic CRUD handlers bound to whatever resource the state carries.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use configs::DeleteMode;
use serde_json::{json, Map, Value};
use service::record::Record;
use tracing::debug;

use crate::errors::ApiError;
use crate::routes::body::{decode, JsonBody};
use crate::state::ServiceState;

fn filters_from_query(query: HashMap<String, String>) -> Map<String, Value> {
    query.into_iter().map(|(k, v)| (k, Value::String(v))).collect()
}

/// List every record, or the records matching the query-string filters.
#[utoipa::path(
    get,
    path = "/{resource}",
    tag = "records",
    params(("resource" = String, Path, description = "Resource path, e.g. flights")),
    responses((status = 200, description = "Matching records"), (status = 500, description = "Service not initialized"))
)]
pub async fn list(
    State(state): State<ServiceState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let store = state.store()?;
    let records = if query.is_empty() {
        store.list().await
    } else {
        let filters = filters_from_query(query);
        debug!(filters = filters.len(), "search");
        store.search(&filters).await
    };
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/{resource}/{id}",
    tag = "records",
    params(("resource" = String, Path,), ("id" = String, Path,)),
    responses((status = 200, description = "Record"), (status = 404, description = "Not found"))
)]
pub async fn get_one(State(state): State<ServiceState>, Path(id): Path<String>) -> Result<Json<Record>, ApiError> {
    let store = state.store()?;
    store.get_by_id(&id).await.map(Json).ok_or(ApiError::NotFound)
}

#[utoipa::path(
    post,
    path = "/{resource}",
    tag = "records",
    params(("resource" = String, Path,)),
    responses((status = 201, description = "Created"), (status = 400, description = "No data provided"))
)]
pub async fn create(State(state): State<ServiceState>, body: Bytes) -> Result<Response, ApiError> {
    let store = state.store()?;
    let record = match decode(&body) {
        JsonBody::Object(record) => record,
        JsonBody::Invalid => return Err(ApiError::BadRequest("Invalid JSON body".into())),
        JsonBody::Empty | JsonBody::NotObject => return Err(ApiError::BadRequest("No data provided".into())),
    };
    let created = store.create(record).await;
    Ok((StatusCode::CREATED, Json(json!({"status": "created", "data": created}))).into_response())
}

/// Shallow merge for both PUT and PATCH. An empty body leaves the record as is.
#[utoipa::path(
    put,
    path = "/{resource}/{id}",
    tag = "records",
    params(("resource" = String, Path,), ("id" = String, Path,)),
    responses((status = 200, description = "Updated"), (status = 404, description = "Not found"))
)]
pub async fn update(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let store = state.store()?;
    match decode(&body) {
        JsonBody::Empty => {
            let existing = store.get_by_id(&id).await.ok_or(ApiError::NotFound)?;
            Ok(Json(existing).into_response())
        }
        JsonBody::Object(partial) => {
            let merged = store.update(&id, partial).await.ok_or(ApiError::NotFound)?;
            Ok(Json(json!({"status": "updated", "data": merged})).into_response())
        }
        JsonBody::Invalid => Err(ApiError::BadRequest("Invalid JSON body".into())),
        JsonBody::NotObject => Err(ApiError::BadRequest("No data provided".into())),
    }
}

/// Remove the record, or mark it cancelled for resources configured that way.
#[utoipa::path(
    delete,
    path = "/{resource}/{id}",
    tag = "records",
    params(("resource" = String, Path,), ("id" = String, Path,)),
    responses(
        (status = 200, description = "Deleted"),
        (status = 204, description = "Cancelled"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete(State(state): State<ServiceState>, Path(id): Path<String>) -> Result<Response, ApiError> {
    let store = state.store()?;
    match state.resource.delete_mode {
        DeleteMode::Cancel => {
            let mut status = Record::new();
            status.insert("status".into(), json!("cancelled"));
            store.update(&id, status).await.ok_or(ApiError::NotFound)?;
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        DeleteMode::Remove => {
            if !store.delete(&id).await {
                return Err(ApiError::NotFound);
            }
            Ok(Json(json!({"status": "deleted"})).into_response())
        }
    }
}
