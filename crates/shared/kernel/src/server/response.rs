//! JSON failure bodies shared by every slice.
//!
//! Every non-2xx answer the booking API gives has the shape `{ "success": false, "message": ... }`.

use crate::domain::constants::SERVER_ERROR_MESSAGE;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// `{ success: false, message }` with the given status.
pub fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "success": false, "message": message.into() }))).into_response()
}

/// The generic 500; the cause is expected to be logged by the caller.
pub fn server_error() -> Response {
    failure(StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_MESSAGE)
}
