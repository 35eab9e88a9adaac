use crate::domain::constants::SYSTEM_TAG;
use axum::http::header;
use axum::{Json, response::IntoResponse};
use slotbook_derive::{api_handler, api_model};
use std::sync::LazyLock;
use std::time::Instant;

#[api_model]
/// Liveness probe body
struct HealthResponse {
    /// Always `up` while the process serves requests
    status: &'static str,
    /// Server build version
    version: &'static str,
    /// Seconds since first probe
    uptime: u64,
}

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

#[api_handler(
    get,
    path = "/health",
    responses((status = OK, description = "Server is up", body = HealthResponse)),
    tag = SYSTEM_TAG,
)]
pub(super) async fn health_handler() -> impl IntoResponse {
    let body = HealthResponse {
        status: "up",
        version: env!("CARGO_PKG_VERSION"),
        uptime: START_TIME.elapsed().as_secs(),
    };

    ([(header::CACHE_CONTROL, "no-store, no-cache, must-revalidate")], Json(body))
}
