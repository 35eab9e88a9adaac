//! The registration ledger: one JSON array document holding every admitted record.

use crate::error::{BookingError, BookingErrorExt};
use crate::settings::EventSettings;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use slotbook_derive::api_model;
use slotbook_storage::Storage;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, warn};

#[api_model]
/// One admitted registration. Never modified after creation.
///
/// The ledger may be edited by hand, so every field reads leniently: numbers become
/// strings and missing fields read as blank rather than discarding the record.
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    /// Admission time, RFC 3339 UTC with milliseconds
    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub college: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: String,
    /// Ten digits
    #[serde(default, deserialize_with = "lenient_string")]
    pub contact: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    /// Food preference
    #[serde(default, deserialize_with = "lenient_string")]
    pub food: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cohort: String,
}

/// Scalars as text; `null`, arrays and objects read as blank.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Admitted registrations on one date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotCounts {
    /// Every configured cohort, zero when nobody booked it.
    pub per_cohort: BTreeMap<String, usize>,
    pub total: usize,
}

/// Capacity left on one date. Never negative, even when limits were lowered after booking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capacity {
    pub total_remaining: usize,
    pub remaining_by_cohort: BTreeMap<String, usize>,
}

/// Tallies records on `date` whose cohort is one of `cohorts`.
///
/// Records for cohorts that were since removed from the settings count towards
/// neither the cohort nor the total.
///
/// ```rust
/// use slotbook_booking::ledger::{Registration, counts_for_date};
///
/// let record = |date: &str, cohort: &str| Registration {
///     timestamp: String::new(),
///     name: "A".into(),
///     college: "B".into(),
///     year: "1".into(),
///     contact: "1111111111".into(),
///     email: "a@b.c".into(),
///     food: "Veg".into(),
///     date: date.into(),
///     cohort: cohort.into(),
/// };
/// let records = [record("2024-01-01", "Alpha"), record("2024-01-02", "Alpha")];
/// let counts = counts_for_date(&records, "2024-01-01", &["Alpha".into(), "Beta".into()]);
///
/// assert_eq!(counts.total, 1);
/// assert_eq!(counts.per_cohort["Beta"], 0);
/// ```
#[must_use]
pub fn counts_for_date(records: &[Registration], date: &str, cohorts: &[String]) -> SlotCounts {
    let mut per_cohort: BTreeMap<String, usize> = cohorts.iter().map(|c| (c.clone(), 0)).collect();
    let mut total = 0;

    for record in records.iter().filter(|r| r.date == date) {
        if let Some(count) = per_cohort.get_mut(&record.cohort) {
            *count += 1;
            total += 1;
        }
    }

    SlotCounts { per_cohort, total }
}

impl SlotCounts {
    #[must_use]
    pub fn remaining(&self, settings: &EventSettings) -> Capacity {
        let per_cohort_limit = settings.per_cohort_limit as usize;
        Capacity {
            total_remaining: (settings.per_day_limit as usize).saturating_sub(self.total),
            remaining_by_cohort: self
                .per_cohort
                .iter()
                .map(|(cohort, count)| (cohort.clone(), per_cohort_limit.saturating_sub(*count)))
                .collect(),
        }
    }

    #[must_use]
    pub fn cohort(&self, cohort: &str) -> usize {
        self.per_cohort.get(cohort).copied().unwrap_or(0)
    }
}

impl Capacity {
    /// No seats anywhere, for dates that are not open.
    #[must_use]
    pub fn closed(cohorts: &[String]) -> Self {
        Self {
            total_remaining: 0,
            remaining_by_cohort: cohorts.iter().map(|c| (c.clone(), 0)).collect(),
        }
    }
}

/// Whole-document access to the ledger.
///
/// Loading never fails; saving replaces the document atomically. The ledger does not
/// serialize writers itself, see [`crate::AdmissionController`].
#[derive(Debug, Clone)]
pub struct Ledger {
    storage: Storage,
    path: PathBuf,
}

impl Ledger {
    pub fn new(storage: Storage, path: impl Into<PathBuf>) -> Self {
        Self { storage, path: path.into() }
    }

    /// Every record in insertion order. Absent or corrupt documents read as empty.
    /// Entries that are not JSON objects are skipped; objects are always kept.
    pub async fn load(&self) -> Vec<Registration> {
        let raw = match self.storage.read_optional(&self.path).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Ledger unreadable, treating as empty");
                return Vec::new();
            },
        };

        let entries = match serde_json::from_slice::<Value>(&raw) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => {
                warn!(path = %self.path.display(), "Ledger is not an array, treating as empty");
                return Vec::new();
            },
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Ledger malformed, treating as empty");
                return Vec::new();
            },
        };

        let total = entries.len();
        let records: Vec<Registration> = entries
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect();
        if records.len() < total {
            warn!(
                path = %self.path.display(),
                skipped = total - records.len(),
                "Ledger contains entries that are not objects"
            );
        }
        records
    }

    /// Overwrites the ledger with `records`.
    ///
    /// # Errors
    /// Returns [`BookingError::Storage`] if the document cannot be written.
    pub async fn save(&self, records: &[Registration]) -> Result<(), BookingError> {
        self.storage
            .save_json(&self.path, records)
            .await
            .context(format!("Saving ledger {}", self.path.display()))?;
        debug!(records = records.len(), "Ledger saved");
        Ok(())
    }
}
