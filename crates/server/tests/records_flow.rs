use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use configs::ResourceSettings;
use serde_json::{json, Value};
use server::{routes, state::ServiceState};
use service::storage::{IdPolicy, RecordStore};
use tower::Service;

mod support;
use support::{app_for, cors, send, send_raw, state_for};

const RESOURCES: [&str; 10] = [
    "flights",
    "passengers",
    "bookings",
    "tickets",
    "checkin",
    "baggage",
    "loyalty",
    "pricing",
    "notifications",
    "ancillaries",
];

#[tokio::test]
async fn create_without_identifier_assigns_uuid() -> anyhow::Result<()> {
    let app = app_for("flights", json!({"flights": {}}))?;
    let (status, body) = send(&app, "POST", "/flights", Some(json!({"origin": "JFK"}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "created");
    let id = body["data"]["flight_id"].as_str().unwrap_or_default().to_string();
    assert!(uuid::Uuid::parse_str(&id).is_ok(), "not a uuid: {id}");

    let (status, fetched) = send(&app, "GET", &format!("/flights/{id}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["origin"], "JFK");
    Ok(())
}

#[tokio::test]
async fn bookings_get_prefixed_identifier() -> anyhow::Result<()> {
    let app = app_for("bookings", json!({"bookings": {}}))?;
    let (status, body) = send(&app, "POST", "/bookings", Some(json!({"flight_id": "FL100"}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["booking_id"].as_str().unwrap_or_default();
    assert_eq!(id.len(), 8);
    assert!(id.starts_with("BK"));
    assert!(id[2..].chars().all(|c| c.is_ascii_digit()));
    Ok(())
}

#[tokio::test]
async fn post_without_data_is_rejected() -> anyhow::Result<()> {
    let app = app_for("tickets", json!({"tickets": {}}))?;
    let (status, body) = send(&app, "POST", "/tickets", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No data provided"}));

    let (status, _) = send(&app, "POST", "/tickets", Some(json!({}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = Request::builder()
        .method("POST")
        .uri("/tickets")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))?;
    let (status, body) = send_raw(&app, req).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid JSON body"}));
    Ok(())
}

#[tokio::test]
async fn put_with_empty_body_is_a_noop() -> anyhow::Result<()> {
    let app = app_for("passengers", json!({"passengers": {"P1": {"passenger_id": "P1", "name": "Ada"}}}))?;
    for _ in 0..2 {
        let (status, body) = send(&app, "PUT", "/passengers/P1", None).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"passenger_id": "P1", "name": "Ada"}));
    }
    Ok(())
}

#[tokio::test]
async fn patch_merges_shallowly() -> anyhow::Result<()> {
    let app = app_for("tickets", json!({"tickets": {"T1": {"ticket_id": "T1", "a": 1, "b": 2}}}))?;
    let (status, body) = send(&app, "PATCH", "/tickets/T1", Some(json!({"b": 3}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "updated", "data": {"ticket_id": "T1", "a": 1, "b": 3}}));

    let (status, _) = send(&app, "PUT", "/tickets/T9", Some(json!({"b": 3}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn update_overwrites_identifier_field_but_keeps_lookup_key() -> anyhow::Result<()> {
    let app = app_for("tickets", json!({"tickets": {"T1": {"ticket_id": "T1", "a": 1}}}))?;
    let (status, body) = send(&app, "PUT", "/tickets/T1", Some(json!({"ticket_id": "T2", "a": 2}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"ticket_id": "T2", "a": 2}));

    let (status, body) = send(&app, "GET", "/tickets/T1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ticket_id"], "T2");
    let (status, _) = send(&app, "GET", "/tickets/T2", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn search_is_permissive_on_missing_fields() -> anyhow::Result<()> {
    let app = app_for(
        "flights",
        json!({"flights": {
            "F1": {"flight_id": "F1", "origin": "JFK", "gate": "A1"},
            "F2": {"flight_id": "F2", "origin": "JFK"},
            "F3": {"flight_id": "F3", "origin": "LHR", "gate": "A1"}
        }}),
    )?;
    for uri in ["/flights?gate=A1&origin=JFK", "/flights/search?gate=A1&origin=JFK"] {
        let (status, body) = send(&app, "GET", uri, None).await?;
        assert_eq!(status, StatusCode::OK);
        let mut ids: Vec<String> = body
            .as_array()
            .map(|a| a.iter().filter_map(|r| r["flight_id"].as_str().map(String::from)).collect())
            .unwrap_or_default();
        ids.sort();
        assert_eq!(ids, vec!["F1", "F2"]);
    }

    let (_, all) = send(&app, "GET", "/flights", None).await?;
    assert_eq!(all.as_array().map(Vec::len), Some(3));
    Ok(())
}

#[tokio::test]
async fn deleting_a_booking_cancels_it() -> anyhow::Result<()> {
    let app = app_for("bookings", json!({"bookings": {"BK100001": {"booking_id": "BK100001", "status": "confirmed"}}}))?;
    let (status, body) = send(&app, "DELETE", "/bookings/BK100001", None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, "GET", "/bookings/BK100001", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");

    let (status, _) = send(&app, "DELETE", "/bookings/BK999999", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn deleting_other_resources_removes_them() -> anyhow::Result<()> {
    let app = app_for("tickets", json!({"tickets": {"T1": {"ticket_id": "T1"}}}))?;
    let (status, body) = send(&app, "DELETE", "/tickets/T1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "deleted"}));
    let (status, _) = send(&app, "GET", "/tickets/T1", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", "/tickets/T1", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn unknown_identifier_is_not_found_for_every_resource() -> anyhow::Result<()> {
    for resource in RESOURCES {
        let app = app_for(resource, json!({}))?;
        let (status, body) = send(&app, "GET", &format!("/{resource}/doesnotexist"), None).await?;
        assert_eq!(status, StatusCode::NOT_FOUND, "resource {resource}");
        assert_eq!(body, json!({"error": "Not found", "status": 404}));
    }
    Ok(())
}

#[tokio::test]
async fn requests_before_store_install_are_rejected() -> anyhow::Result<()> {
    let state = ServiceState::new(ResourceSettings::profile("flights"), "/nonexistent/openapi.yaml");
    let app = routes::build_router(state.clone(), cors());

    let (status, body) = send(&app, "GET", "/flights", None).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Service not initialized"}));

    let (status, body) = send(&app, "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "records": 0}));

    assert!(state.install(Arc::new(RecordStore::new("flight_id", IdPolicy::Uuid))));
    let (status, body) = send(&app, "GET", "/flights", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    Ok(())
}

#[tokio::test]
async fn health_counts_records() -> anyhow::Result<()> {
    let app = app_for("flights", json!({"flights": {"F1": {"flight_id": "F1"}, "F2": {"flight_id": "F2"}}}))?;
    let (status, body) = send(&app, "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "records": 2}));
    Ok(())
}

#[tokio::test]
async fn openapi_falls_back_to_generated_document() -> anyhow::Result<()> {
    let app = app_for("flights", json!({}))?;
    let req = Request::builder().uri("/openapi.yaml").body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").and_then(|v| v.to_str().ok()),
        Some("application/x-yaml")
    );
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    assert!(String::from_utf8_lossy(&bytes).contains("openapi"));
    Ok(())
}

#[tokio::test]
async fn independent_states_do_not_share_data() -> anyhow::Result<()> {
    let a = routes::build_router(state_for("flights", json!({}))?, cors());
    let b = routes::build_router(state_for("flights", json!({}))?, cors());
    send(&a, "POST", "/flights", Some(json!({"flight_id": "F1"}))).await?;
    let (_, listed) = send(&b, "GET", "/flights", None).await?;
    assert_eq!(listed, json!([]));
    Ok(())
}
