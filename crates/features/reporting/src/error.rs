use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use slotbook_kernel::server::ApiStateError;
use slotbook_kernel::server::response::{failure, server_error};
use std::borrow::Cow;
use tracing::{error, warn};

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

#[slotbook_derive::slotbook_error]
pub enum ReportingError {
    /// Missing or wrong admin password. The response never says which.
    #[error("Unauthorized{}", format_context(.context))]
    Unauthorized { context: Option<Cow<'static, str>> },
    #[error("Reporting state error{}: {source}", format_context(.context))]
    State { source: ApiStateError, context: Option<Cow<'static, str>> },
}

impl IntoResponse for ReportingError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized { .. } => {
                warn!(error = %self, "Admin request refused");
                failure(StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE)
            },
            other => {
                error!(error = %other, "Reporting request failed");
                server_error()
            },
        }
    }
}
