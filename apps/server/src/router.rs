use axum::Router;
use slotbook::kernel::prelude::ApiState;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(
    info(title = "SlotBook API", description = "Cohort slot booking with capacity limits"),
    tags(
        (name = "System", description = "Health and diagnostics"),
        (name = "Booking", description = "Public registration endpoints"),
        (name = "Admin", description = "Ledger exports behind the admin password"),
    )
)]
struct ApiDoc;

#[allow(unreachable_pub)]
pub fn init(state: ApiState) -> Router {
    let static_dir = state.config.storage.static_dir.clone();

    // Separate the OpenAPI routes and the API documentation object
    let (api_routes, api_doc) =
        OpenApiRouter::with_openapi(ApiDoc::openapi()).merge(slotbook::api_router()).split_for_parts();

    // Scalar UI at /api; anything unrouted is served from the static directory
    Router::new()
        .merge(api_routes)
        .merge(Scalar::with_url("/api", api_doc))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
