#![allow(dead_code)]

use serde_json::{Value, json};
use slotbook_booking::{Booking, RegistrationRequest};
use slotbook_event_bus::EventBus;
use slotbook_kernel::domain::config::ApiConfig;
use slotbook_storage::Storage;
use tempfile::TempDir;

pub struct Harness {
    pub dir: TempDir,
    pub storage: Storage,
    pub events: EventBus,
    pub booking: Booking,
}

pub fn worked_example() -> Value {
    json!({
        "cohorts": ["Alpha", "Beta"],
        "perDayLimit": 2,
        "perCohortLimit": 1,
        "allowedDates": ["2024-01-01"],
    })
}

pub async fn harness(settings: Value, allow_reset: bool) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::builder().root(dir.path()).connect().await.unwrap();
    let mut config = ApiConfig::default();
    config.booking.allow_reset = allow_reset;
    storage.save_json(&config.booking.settings_file, &settings).await.unwrap();

    let events = EventBus::new();
    let booking = Booking::from_config(&config, &storage, &events).unwrap();
    Harness { dir, storage, events, booking }
}

pub fn request(contact: &str, cohort: &str) -> RegistrationRequest {
    RegistrationRequest {
        name: "Grace Hopper".into(),
        college: "Vassar".into(),
        year: "3".into(),
        contact: contact.into(),
        email: "grace@example.org".into(),
        food: "Non-veg".into(),
        date: "2024-01-01".into(),
        cohort: cohort.into(),
    }
}

pub fn contact(n: usize) -> String {
    format!("{:010}", 1_000_000_000 + n)
}
