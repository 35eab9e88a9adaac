use crate::Booking;
use crate::admission::{RegistrationRequest, ResetOutcome};
use crate::error::BookingError;
use crate::model::{
    MessageResponse, RESET_DISABLED_MESSAGE, RESET_DONE_MESSAGE, RegisterResponse, SlotsQuery,
    SlotsResponse,
};
use crate::settings::PublicSettings;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use slotbook_derive::api_handler;
use slotbook_kernel::domain::constants::BOOKING_TAG;
use slotbook_kernel::server::ApiState;
use slotbook_kernel::server::response::failure;

#[api_handler(
    get,
    path = "/api/config",
    responses((status = OK, description = "Public event settings", body = PublicSettings)),
    tag = BOOKING_TAG,
)]
pub(crate) async fn config_handler(
    State(state): State<ApiState>,
) -> Result<Json<PublicSettings>, BookingError> {
    let booking = state.try_get_slice::<Booking>()?;
    Ok(Json(booking.settings.get().await.public_view()))
}

#[api_handler(
    get,
    path = "/api/slots",
    params(SlotsQuery),
    responses((status = OK, description = "Occupancy of the date", body = SlotsResponse)),
    tag = BOOKING_TAG,
)]
pub(crate) async fn slots_handler(
    State(state): State<ApiState>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, BookingError> {
    let booking = state.try_get_slice::<Booking>()?;
    let report = booking.admission.slots(query.date.as_deref().unwrap_or_default()).await;
    Ok(Json(report.into()))
}

#[api_handler(
    post,
    path = "/api/register",
    request_body(content = RegistrationRequest, content_type = "application/json"),
    responses(
        (status = OK, description = "Admitted or rejected; see `success`", body = RegisterResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Ledger could not be saved", body = MessageResponse),
    ),
    tag = BOOKING_TAG,
)]
pub(crate) async fn register_handler(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<Json<RegisterResponse>, BookingError> {
    let booking = state.try_get_slice::<Booking>()?;
    let admission = booking.admission.register(RegistrationRequest::from_body(&body)).await?;
    Ok(Json(admission.into()))
}

#[api_handler(
    post,
    path = "/api/reset",
    responses(
        (status = OK, description = "Ledger cleared", body = MessageResponse),
        (status = FORBIDDEN, description = "Reset is disabled for this deployment", body = MessageResponse),
    ),
    tag = BOOKING_TAG,
)]
pub(crate) async fn reset_handler(State(state): State<ApiState>) -> Result<Response, BookingError> {
    let booking = state.try_get_slice::<Booking>()?;
    let response = match booking.admission.reset().await? {
        ResetOutcome::Disabled => failure(StatusCode::FORBIDDEN, RESET_DISABLED_MESSAGE),
        ResetOutcome::Cleared { .. } => Json(MessageResponse {
            success: true,
            message: RESET_DONE_MESSAGE.to_owned(),
        })
        .into_response(),
    };
    Ok(response)
}
