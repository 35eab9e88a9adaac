//! # Notifier
//!
//! Sends a confirmation email for every admitted registration. Delivery is best effort:
//! it happens after the admission response is decided, failures are logged and dropped,
//! and nothing is retried.

mod error;
mod listener;
pub mod mail;

pub use crate::error::{NotifierError, NotifierErrorExt};
pub use crate::mail::{Confirmation, Mailer, SmtpMailer};

use slotbook_booking::RegistrationAdmitted;
use slotbook_event_bus::EventBus;
use slotbook_kernel::domain::registry::InitializedSlice;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Notifier feature state.
#[slotbook_derive::slotbook_slice]
pub struct Notifier {
    listener: JoinHandle<()>,
}

impl Notifier {
    /// Subscribes `mailer` to admission events. Must be called inside a Tokio runtime.
    ///
    /// # Errors
    /// Returns [`NotifierError::Events`] if the subscription cannot be created.
    pub fn start<M: Mailer>(events: &EventBus, mailer: M) -> Result<Self, NotifierError> {
        let receiver = events
            .subscribe::<RegistrationAdmitted>()
            .context("Subscribing to admissions")?;
        let listener = listener::spawn(receiver, Arc::new(mailer));
        Ok(Self::new(NotifierInner { listener }))
    }

    /// Whether the event listener is still alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.listener.is_finished()
    }
}

/// Initialize the notifier feature with SMTP delivery.
///
/// # Errors
/// See [`Notifier::start`].
pub fn init(events: &EventBus) -> Result<InitializedSlice, NotifierError> {
    let slice = Notifier::start(events, SmtpMailer)?;
    tracing::info!("Notifier slice initialized");
    Ok(InitializedSlice::new(slice))
}
