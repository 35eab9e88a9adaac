//! Serialized admission: the only writer of the ledger.

use crate::error::BookingError;
use crate::ledger::{Capacity, Ledger, Registration, SlotCounts, counts_for_date};
use crate::settings::{EventSettings, SettingsStore, SmtpSettings};
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use slotbook_derive::api_model;
use slotbook_event_bus::EventBus;
use std::fmt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const DATE_NOT_ALLOWED: &str = "Selected date is not allowed.";

#[api_model]
/// Registration form. Numbers are accepted in place of strings.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistrationRequest {
    #[serde(default, deserialize_with = "crate::ledger::lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::ledger::lenient_string")]
    pub college: String,
    #[serde(default, deserialize_with = "crate::ledger::lenient_string")]
    pub year: String,
    /// Exactly ten digits
    #[serde(default, deserialize_with = "crate::ledger::lenient_string")]
    pub contact: String,
    #[serde(default, deserialize_with = "crate::ledger::lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "crate::ledger::lenient_string")]
    pub food: String,
    #[serde(default, deserialize_with = "crate::ledger::lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "crate::ledger::lenient_string")]
    pub cohort: String,
}

impl RegistrationRequest {
    /// Parses a request body. Anything that is not a JSON object reads as blank fields.
    #[must_use]
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(object @ Value::Object(_)) => serde_json::from_value(object).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    fn trimmed(self) -> Self {
        let trim = |s: String| s.trim().to_owned();
        Self {
            name: trim(self.name),
            college: trim(self.college),
            year: trim(self.year),
            contact: trim(self.contact),
            email: trim(self.email),
            food: trim(self.food),
            date: trim(self.date),
            cohort: trim(self.cohort),
        }
    }

    fn fields(&self) -> [&str; 8] {
        [
            &self.name,
            &self.college,
            &self.year,
            &self.contact,
            &self.email,
            &self.food,
            &self.date,
            &self.cohort,
        ]
    }

    /// Checks that need no ledger state. Expects trimmed fields.
    fn validate(&self, settings: &EventSettings) -> Result<(), Rejection> {
        if self.fields().iter().any(|f| f.is_empty()) || !is_contact(&self.contact) {
            return Err(Rejection::InvalidFields);
        }
        if !settings.allows_date(&self.date) {
            return Err(Rejection::DateNotAllowed);
        }
        if !settings.has_cohort(&self.cohort) {
            return Err(Rejection::InvalidCohort);
        }
        Ok(())
    }

    fn into_record(self, timestamp: String) -> Registration {
        Registration {
            timestamp,
            name: self.name,
            college: self.college,
            year: self.year,
            contact: self.contact,
            email: self.email,
            food: self.food,
            date: self.date,
            cohort: self.cohort,
        }
    }
}

fn is_contact(contact: &str) -> bool {
    contact.len() == 10 && contact.bytes().all(|b| b.is_ascii_digit())
}

/// Why a registration was turned away. Displays as the message shown to the participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    InvalidFields,
    DateNotAllowed,
    InvalidCohort,
    AlreadyBooked,
    DayFull { limit: u32 },
    CohortFull { cohort: String },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFields => f.write_str("Missing/invalid fields."),
            Self::DateNotAllowed => f.write_str(DATE_NOT_ALLOWED),
            Self::InvalidCohort => f.write_str("Invalid cohort."),
            Self::AlreadyBooked => f.write_str("You already have a booking for this date."),
            Self::DayFull { limit } => write!(f, "All {limit} slots are booked for this date."),
            Self::CohortFull { cohort } => write!(f, "{cohort} cohort is full for this date."),
        }
    }
}

impl Rejection {
    /// Short label for logs.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidFields => "invalid_fields",
            Self::DateNotAllowed => "date_not_allowed",
            Self::InvalidCohort => "invalid_cohort",
            Self::AlreadyBooked => "already_booked",
            Self::DayFull { .. } => "day_full",
            Self::CohortFull { .. } => "cohort_full",
        }
    }
}

/// A committed registration with the date's state right after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admitted {
    pub record: Registration,
    pub counts: SlotCounts,
    pub capacity: Capacity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Admitted(Box<Admitted>),
    Rejected(Rejection),
}

impl Admission {
    #[must_use]
    pub const fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The deployment does not allow resets; nothing was touched.
    Disabled,
    Cleared { removed: usize },
}

/// Occupancy of one date as reported to participants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotsReport {
    pub date: String,
    pub counts: SlotCounts,
    pub capacity: Capacity,
    pub per_day_limit: u32,
    pub per_cohort_limit: u32,
    /// Set when the date is closed; counts are then all zero.
    pub closed: Option<Rejection>,
}

/// Published after a registration is committed and the admission lock released.
#[derive(Debug, Clone)]
pub struct RegistrationAdmitted {
    pub record: Registration,
    /// Mail account as configured when the registration was admitted.
    pub smtp: Option<SmtpSettings>,
}

/// Decides and commits registrations one at a time.
///
/// All ledger writes (register and reset) pass through one process-wide FIFO lock, and
/// the ledger is re-read inside it, so concurrent requests can never both take the last
/// seat. Reads that do not decide anything stay outside the lock.
#[derive(Debug)]
pub struct AdmissionController {
    settings: SettingsStore,
    ledger: Ledger,
    events: EventBus,
    allow_reset: bool,
    gate: Mutex<()>,
}

impl AdmissionController {
    pub fn new(settings: SettingsStore, ledger: Ledger, events: EventBus, allow_reset: bool) -> Self {
        Self { settings, ledger, events, allow_reset, gate: Mutex::new(()) }
    }

    /// Validates and, if capacity allows, commits a registration.
    ///
    /// # Errors
    /// Returns [`BookingError::Storage`] if the ledger cannot be saved. The lock is
    /// released either way.
    pub async fn register(&self, request: RegistrationRequest) -> Result<Admission, BookingError> {
        let candidate = request.trimmed();

        let snapshot = self.settings.get().await;
        if let Err(rejection) = candidate.validate(&snapshot) {
            debug!(reason = rejection.reason(), "Registration rejected");
            return Ok(Admission::Rejected(rejection));
        }

        let (admitted, smtp) = {
            let _guard = self.gate.lock().await;

            let settings = self.settings.get().await;
            let mut records = self.ledger.load().await;

            if let Some(rejection) = decide(&records, &candidate, &settings) {
                info!(
                    date = %candidate.date,
                    cohort = %candidate.cohort,
                    reason = rejection.reason(),
                    "Registration rejected"
                );
                return Ok(Admission::Rejected(rejection));
            }

            let record = candidate.into_record(now());
            records.push(record.clone());
            self.ledger.save(&records).await?;

            let counts = counts_for_date(&records, &record.date, &settings.cohorts);
            let capacity = counts.remaining(&settings);
            info!(
                date = %record.date,
                cohort = %record.cohort,
                day_total = counts.total,
                "Registration admitted"
            );
            (Admitted { record, counts, capacity }, settings.smtp)
        };

        self.announce(RegistrationAdmitted { record: admitted.record.clone(), smtp });
        Ok(Admission::Admitted(Box::new(admitted)))
    }

    /// Empties the ledger if the deployment allows it.
    ///
    /// # Errors
    /// Returns [`BookingError::Storage`] if the empty ledger cannot be saved.
    pub async fn reset(&self) -> Result<ResetOutcome, BookingError> {
        if !self.allow_reset {
            warn!("Reset requested while disabled");
            return Ok(ResetOutcome::Disabled);
        }

        let _guard = self.gate.lock().await;
        let removed = self.ledger.load().await.len();
        self.ledger.save(&[]).await?;
        warn!(removed, "Ledger reset");
        Ok(ResetOutcome::Cleared { removed })
    }

    /// Current occupancy of `date`. Closed dates report zeros without reading the ledger.
    pub async fn slots(&self, date: &str) -> SlotsReport {
        let settings = self.settings.get().await;
        let date = date.trim();

        let (counts, capacity, closed) = if settings.allows_date(date) {
            let records = self.ledger.load().await;
            let counts = counts_for_date(&records, date, &settings.cohorts);
            let capacity = counts.remaining(&settings);
            (counts, capacity, None)
        } else {
            let counts = counts_for_date(&[], date, &settings.cohorts);
            (counts, Capacity::closed(&settings.cohorts), Some(Rejection::DateNotAllowed))
        };

        SlotsReport {
            date: date.to_owned(),
            counts,
            capacity,
            per_day_limit: settings.per_day_limit,
            per_cohort_limit: settings.per_cohort_limit,
            closed,
        }
    }

    /// Whether `POST /api/reset` is enabled for this deployment.
    #[must_use]
    pub const fn reset_allowed(&self) -> bool {
        self.allow_reset
    }

    fn announce(&self, event: RegistrationAdmitted) {
        match self.events.publish(event) {
            Ok(delivered) => debug!(delivered, "Admission announced"),
            Err(err) => warn!(error = %err, "Failed to announce admission"),
        }
    }
}

/// The locked decision against the settings read under the lock: field, date and cohort
/// checks again, then duplicate, day limit and cohort limit.
fn decide(
    records: &[Registration],
    candidate: &RegistrationRequest,
    settings: &EventSettings,
) -> Option<Rejection> {
    if let Err(rejection) = candidate.validate(settings) {
        return Some(rejection);
    }
    if records.iter().any(|r| r.contact == candidate.contact && r.date == candidate.date) {
        return Some(Rejection::AlreadyBooked);
    }

    let counts = counts_for_date(records, &candidate.date, &settings.cohorts);
    if counts.total >= settings.per_day_limit as usize {
        return Some(Rejection::DayFull { limit: settings.per_day_limit });
    }
    if counts.cohort(&candidate.cohort) >= settings.per_cohort_limit as usize {
        return Some(Rejection::CohortFull { cohort: candidate.cohort.clone() });
    }
    None
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
