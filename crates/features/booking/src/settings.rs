//! Event settings: cohorts, capacity limits, allowed dates, the admin secret and mail.
//!
//! The settings document is edited by hand while the event runs, so it is read on every
//! call and coerced field by field. A bad field falls back to its own default without
//! discarding the rest of the document.

use serde_json::{Map, Value};
use slotbook_derive::api_model;
use slotbook_storage::Storage;
use std::path::PathBuf;
use tracing::{debug, warn};

pub const DEFAULT_COHORTS: [&str; 3] = ["Alpha", "Beta", "Gamma"];
pub const DEFAULT_PER_DAY_LIMIT: u32 = 30;
pub const DEFAULT_PER_COHORT_LIMIT: u32 = 10;
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// The tunables every admission decision is made against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSettings {
    pub cohorts: Vec<String>,
    pub per_day_limit: u32,
    pub per_cohort_limit: u32,
    pub allowed_dates: Vec<String>,
    pub admin_password: String,
    pub smtp: Option<SmtpSettings>,
}

/// Outbound mail account. Present only when a host is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// Implicit TLS. When `false` the connection is upgraded with STARTTLS.
    pub secure: bool,
    pub user: String,
    pub pass: String,
    pub from: String,
}

#[api_model]
/// Settings anyone may read
#[derive(Clone, PartialEq, Eq)]
pub struct PublicSettings {
    /// Cohorts open for registration
    pub cohorts: Vec<String>,
    /// Registrations accepted per date across all cohorts
    pub per_day_limit: u32,
    /// Registrations accepted per date and cohort
    pub per_cohort_limit: u32,
    /// Dates open for registration
    pub allowed_dates: Vec<String>,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            cohorts: DEFAULT_COHORTS.iter().map(|c| (*c).to_owned()).collect(),
            per_day_limit: DEFAULT_PER_DAY_LIMIT,
            per_cohort_limit: DEFAULT_PER_COHORT_LIMIT,
            allowed_dates: Vec::new(),
            admin_password: String::new(),
            smtp: None,
        }
    }
}

impl EventSettings {
    /// Builds settings from an arbitrary JSON document. Never fails.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let defaults = Self::default();
        let Some(doc) = value.as_object() else {
            warn!("Settings document is not an object, using defaults");
            return defaults;
        };

        let cohorts = string_list(doc.get("cohorts"))
            .filter(|list| !list.is_empty())
            .unwrap_or(defaults.cohorts);

        Self {
            cohorts,
            per_day_limit: limit(doc.get("perDayLimit")).unwrap_or(DEFAULT_PER_DAY_LIMIT),
            per_cohort_limit: limit(doc.get("perCohortLimit")).unwrap_or(DEFAULT_PER_COHORT_LIMIT),
            allowed_dates: string_list(doc.get("allowedDates")).unwrap_or_default(),
            admin_password: secret(doc.get("adminPassword")).unwrap_or_default(),
            smtp: doc.get("smtp").and_then(Value::as_object).and_then(SmtpSettings::from_map),
        }
    }

    #[must_use]
    pub fn allows_date(&self, date: &str) -> bool {
        !date.is_empty() && self.allowed_dates.iter().any(|d| d == date)
    }

    #[must_use]
    pub fn has_cohort(&self, cohort: &str) -> bool {
        !cohort.is_empty() && self.cohorts.iter().any(|c| c == cohort)
    }

    /// The projection served to unauthenticated clients.
    #[must_use]
    pub fn public_view(&self) -> PublicSettings {
        PublicSettings {
            cohorts: self.cohorts.clone(),
            per_day_limit: self.per_day_limit,
            per_cohort_limit: self.per_cohort_limit,
            allowed_dates: self.allowed_dates.clone(),
        }
    }
}

impl SmtpSettings {
    fn from_map(map: &Map<String, Value>) -> Option<Self> {
        let host = text(map.get("host")).filter(|h| !h.is_empty())?;
        let user = text(map.get("user")).unwrap_or_default();
        let from = text(map.get("from")).filter(|f| !f.is_empty()).unwrap_or_else(|| user.clone());

        Some(Self {
            host,
            port: limit(map.get("port"))
                .and_then(|p| u16::try_from(p).ok())
                .filter(|p| *p > 0)
                .unwrap_or(DEFAULT_SMTP_PORT),
            secure: flag(map.get("secure")).unwrap_or(false),
            user,
            pass: text(map.get("pass")).unwrap_or_default(),
            from,
        })
    }
}

/// Non-negative integer from a number or numeric string. Fractions truncate toward zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn limit(value: Option<&Value>) -> Option<u32> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !number.is_finite() || number < 0.0 || number > f64::from(u32::MAX) {
        return None;
    }
    Some(number.trunc() as u32)
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Like [`text`] but verbatim: surrounding whitespace is part of a secret.
fn secret(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn flag(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect(),
    )
}

/// Read-through access to the settings document. No caching.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    storage: Storage,
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(storage: Storage, path: impl Into<PathBuf>) -> Self {
        Self { storage, path: path.into() }
    }

    /// Current settings. Absent, unreadable or malformed documents yield defaults.
    pub async fn get(&self) -> EventSettings {
        let raw = match self.storage.read_optional(&self.path).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(path = %self.path.display(), "No settings document, using defaults");
                return EventSettings::default();
            },
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Settings unreadable, using defaults");
                return EventSettings::default();
            },
        };

        match serde_json::from_slice::<Value>(&raw) {
            Ok(value) => EventSettings::from_value(&value),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Settings malformed, using defaults");
                EventSettings::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_document_is_all_defaults() {
        assert_eq!(EventSettings::from_value(&json!({})), EventSettings::default());
        assert_eq!(EventSettings::from_value(&json!([1, 2])), EventSettings::default());
    }

    #[test]
    fn fields_fall_back_individually() {
        let settings = EventSettings::from_value(&json!({
            "cohorts": "Alpha",
            "perDayLimit": -4,
            "perCohortLimit": "7",
            "allowedDates": ["2024-01-01", 42, "  ", " 2024-01-02 "],
            "adminPassword": 1234,
        }));

        assert_eq!(settings.cohorts, vec!["Alpha", "Beta", "Gamma"]);
        assert_eq!(settings.per_day_limit, DEFAULT_PER_DAY_LIMIT);
        assert_eq!(settings.per_cohort_limit, 7);
        assert_eq!(settings.allowed_dates, vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(settings.admin_password, "1234");
        assert!(settings.smtp.is_none());
    }

    #[test]
    fn limits_accept_floats_and_zero() {
        assert_eq!(limit(Some(&json!(2.9))), Some(2));
        assert_eq!(limit(Some(&json!(0))), Some(0));
        assert_eq!(limit(Some(&json!(" 12 "))), Some(12));
        assert_eq!(limit(Some(&json!("ten"))), None);
        assert_eq!(limit(Some(&json!(null))), None);
        assert_eq!(limit(Some(&json!(1e12))), None);
    }

    #[test]
    fn empty_cohort_list_uses_defaults() {
        let settings = EventSettings::from_value(&json!({ "cohorts": [] }));
        assert_eq!(settings.cohorts.len(), DEFAULT_COHORTS.len());
    }

    #[test]
    fn smtp_requires_host() {
        let none = EventSettings::from_value(&json!({ "smtp": { "user": "a@b.c" } }));
        assert!(none.smtp.is_none());

        let some = EventSettings::from_value(&json!({
            "smtp": { "host": "mail.example.org", "port": "465", "secure": true, "user": "bot@example.org" }
        }));
        let smtp = some.smtp.unwrap();
        assert_eq!(smtp.port, 465);
        assert!(smtp.secure);
        assert_eq!(smtp.from, "bot@example.org");
    }

    #[test]
    fn admin_password_is_kept_verbatim() {
        let settings = EventSettings::from_value(&json!({ "adminPassword": " pw " }));
        assert_eq!(settings.admin_password, " pw ");
    }

    #[test]
    fn date_and_cohort_membership() {
        let settings = EventSettings {
            allowed_dates: vec!["2024-01-01".into()],
            ..EventSettings::default()
        };
        assert!(settings.allows_date("2024-01-01"));
        assert!(!settings.allows_date("2024-01-02"));
        assert!(!settings.allows_date(""));
        assert!(settings.has_cohort("Beta"));
        assert!(!settings.has_cohort("beta"));
    }
}
