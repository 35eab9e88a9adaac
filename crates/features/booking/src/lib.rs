//! # Booking
//!
//! Participants register for a cohort on an allowed date. Admission enforces a per-day
//! cap, a per-(date, cohort) cap and one booking per contact and date.
//!
//! * [`settings`] reads the hand-edited event settings on every call.
//! * [`ledger`] loads and atomically saves the registration document.
//! * [`admission`] owns the single lock every ledger write goes through and announces
//!   each admission on the event bus as [`RegistrationAdmitted`].
//!
//! The slice serves `/api/config`, `/api/slots`, `/api/register` and `/api/reset`.

pub mod admission;
mod error;
mod handlers;
pub mod ledger;
pub mod model;
pub mod settings;

pub use crate::admission::{
    Admission, AdmissionController, Admitted, RegistrationAdmitted, RegistrationRequest, Rejection,
    ResetOutcome, SlotsReport,
};
pub use crate::error::{BookingError, BookingErrorExt};
pub use crate::ledger::{Capacity, Ledger, Registration, SlotCounts, counts_for_date};
pub use crate::settings::{EventSettings, PublicSettings, SettingsStore, SmtpSettings};

use slotbook_event_bus::EventBus;
use slotbook_kernel::domain::config::ApiConfig;
use slotbook_kernel::domain::registry::InitializedSlice;
use slotbook_kernel::server::ApiState;
use slotbook_storage::Storage;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Booking feature state.
#[slotbook_derive::slotbook_slice]
pub struct Booking {
    pub settings: SettingsStore,
    pub ledger: Ledger,
    pub admission: AdmissionController,
}

impl Booking {
    /// Wires the stores and the controller over `storage`.
    ///
    /// # Errors
    /// Returns [`BookingError::Storage`] if a configured document path leaves the
    /// storage sandbox.
    pub fn from_config(
        config: &ApiConfig,
        storage: &Storage,
        events: &EventBus,
    ) -> Result<Self, BookingError> {
        let booking = &config.booking;
        storage.resolve(&booking.settings_file).context("Settings document path")?;
        storage.resolve(&booking.ledger_file).context("Ledger document path")?;

        let settings = SettingsStore::new(storage.clone(), &booking.settings_file);
        let ledger = Ledger::new(storage.clone(), &booking.ledger_file);
        let admission = AdmissionController::new(
            settings.clone(),
            ledger.clone(),
            events.clone(),
            booking.allow_reset,
        );

        Ok(Self::new(BookingInner { settings, ledger, admission }))
    }
}

/// Initialize the booking feature.
///
/// # Errors
/// See [`Booking::from_config`].
pub fn init(
    config: &ApiConfig,
    storage: &Storage,
    events: &EventBus,
) -> Result<InitializedSlice, BookingError> {
    let slice = Booking::from_config(config, storage, events)?;

    tracing::info!(
        settings = %config.booking.settings_file.display(),
        ledger = %config.booking.ledger_file.display(),
        reset_allowed = slice.admission.reset_allowed(),
        "Booking slice initialized"
    );

    Ok(InitializedSlice::new(slice))
}

/// Public booking routes.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::config_handler))
        .routes(routes!(handlers::slots_handler))
        .routes(routes!(handlers::register_handler))
        .routes(routes!(handlers::reset_handler))
}
