//! # Reporting
//!
//! Read-only admin views of the registration ledger, behind the shared admin password:
//! a raw JSON dump, a filtered CSV export and per-date occupancy. None of them takes the
//! admission lock; they see whatever ledger document is on disk.

mod error;
pub mod export;
pub mod guard;
mod handlers;
pub mod model;

pub use crate::error::{ReportingError, ReportingErrorExt, UNAUTHORIZED_MESSAGE};
pub use crate::guard::AdminAccess;

use slotbook_kernel::domain::registry::InitializedSlice;
use slotbook_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Reporting feature state.
#[slotbook_derive::slotbook_slice]
pub struct Reporting {}

/// Initialize the reporting feature. Requires the booking slice at request time.
pub fn init() -> InitializedSlice {
    tracing::info!("Reporting slice initialized");
    InitializedSlice::new(Reporting::new(ReportingInner {}))
}

/// Admin routes.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::data_handler))
        .routes(routes!(handlers::csv_handler))
        .routes(routes!(handlers::summary_handler))
}
