use axum::response::{IntoResponse, Response};
use slotbook_kernel::server::ApiStateError;
use slotbook_kernel::server::response::server_error;
use slotbook_storage::StorageError;
use std::borrow::Cow;
use tracing::error;

/// Faults of the booking slice. Business rejections are not errors; see
/// [`crate::Rejection`].
#[slotbook_derive::slotbook_error]
pub enum BookingError {
    /// The ledger could not be persisted.
    #[error("Booking storage error{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },
    /// The slice is not registered in the application state.
    #[error("Booking state error{}: {source}", format_context(.context))]
    State { source: ApiStateError, context: Option<Cow<'static, str>> },
    #[error("Internal booking error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        error!(error = %self, "Booking request failed");
        server_error()
    }
}
