use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub records: usize,
}

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Airline mock services", description = "In-memory record services for the airline mock environment"),
    paths(
        crate::routes::health::health,
        crate::routes::records::list,
        crate::routes::records::get_one,
        crate::routes::records::create,
        crate::routes::records::update,
        crate::routes::records::delete,
    ),
    components(schemas(HealthResponse, ErrorResponse)),
    tags(
        (name = "health"),
        (name = "records", description = "Generic CRUD over the configured resource"),
    )
)]
pub struct ApiDoc;
