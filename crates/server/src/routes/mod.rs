use axum::{
    routing::get,
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use crate::extensions::ExtensionRegistry;
use crate::state::ServiceState;

pub mod body;
pub mod health;
pub mod records;

/// Generic CRUD routes for the resource mounted at `/{path}`.
pub fn resource_routes(path: &str) -> Router<ServiceState> {
    Router::new()
        .route(&format!("/{path}"), get(records::list).post(records::create))
        .route(&format!("/{path}/search"), get(records::list))
        .route(
            &format!("/{path}/:id"),
            get(records::get_one)
                .put(records::update)
                .patch(records::update)
                .delete(records::delete),
        )
}

/// Router with the built-in extensions.
pub fn build_router(state: ServiceState, cors: CorsLayer) -> Router {
    build_router_with(state, &ExtensionRegistry::builtin(), cors)
}

/// Compose health, OpenAPI, generic and extension routes for the state's resource.
pub fn build_router_with(state: ServiceState, registry: &ExtensionRegistry, cors: CorsLayer) -> Router {
    let path = state.resource.path.clone();

    let mut app = Router::new()
        .route("/health", get(health::health))
        .route("/openapi.yaml", get(health::openapi))
        .merge(resource_routes(&path));

    if let Some(ext) = registry.find(&path) {
        info!(resource = %path, "mounting resource extension");
        app = app.merge(ext.routes(&format!("/{path}")));
    }

    app.with_state(state).layer(cors).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    )
}
