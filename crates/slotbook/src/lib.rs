//! Facade crate for `SlotBook` features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Call [`init`] once at startup to build every enabled feature slice.
//! - Mount [`api_router`] on the application router; it carries the slices' routes and
//!   their `OpenAPI` descriptions.

use slotbook_domain::config::ApiConfig;
use slotbook_event_bus::EventBus;
use slotbook_kernel::server::ApiState;
use slotbook_storage::Storage;
use std::borrow::Cow;
use utoipa_axum::router::OpenApiRouter;

pub use slotbook_domain as domain;
pub use slotbook_event_bus as events;
pub use slotbook_kernel as kernel;
pub use slotbook_storage as storage;

/// Feature registry for runtime introspection.
pub mod features {
    pub use slotbook_booking as booking;
    #[cfg(feature = "notifier")]
    pub use slotbook_notifier as notifier;
    pub use slotbook_reporting as reporting;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        "booking",
        "reporting",
        #[cfg(feature = "notifier")]
        "notifier",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

#[slotbook_derive::slotbook_error]
pub enum SlotbookError {
    #[error("Booking bootstrap failed{}: {source}", format_context(.context))]
    Booking { source: slotbook_booking::BookingError, context: Option<Cow<'static, str>> },
    #[cfg(feature = "notifier")]
    #[error("Notifier bootstrap failed{}: {source}", format_context(.context))]
    Notifier { source: slotbook_notifier::NotifierError, context: Option<Cow<'static, str>> },
}

/// Initialize all enabled features. Must run inside the Tokio runtime.
///
/// # Errors
/// Returns an error if any feature initialization fails.
pub fn init(
    config: &ApiConfig,
    storage: &Storage,
    events: &EventBus,
) -> Result<Vec<domain::registry::InitializedSlice>, SlotbookError> {
    let mut slices = Vec::new();

    // Booking: settings, ledger, admission
    slices.push(features::booking::init(config, storage, events)?);

    // Reporting (admin views)
    slices.push(features::reporting::init());

    // Confirmation mail (optional)
    #[cfg(feature = "notifier")]
    slices.push(features::notifier::init(events)?);

    Ok(slices)
}

/// Routes of every enabled feature plus the system routes.
pub fn api_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .merge(kernel::server::system_router())
        .merge(features::booking::router())
        .merge(features::reporting::router())
}
