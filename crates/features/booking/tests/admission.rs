mod common;

use common::{contact, harness, request, worked_example};
use serde_json::json;
use slotbook_booking::{Admission, RegistrationAdmitted, Rejection, ResetOutcome};
use slotbook_event_bus::EventReceiverExt;
use tokio::task::JoinSet;

fn rejection(admission: &Admission) -> Option<&Rejection> {
    match admission {
        Admission::Rejected(rejection) => Some(rejection),
        Admission::Admitted(_) => None,
    }
}

#[tokio::test]
async fn worked_example_fills_the_cohort() {
    let h = harness(worked_example(), false).await;

    let first = h.booking.admission.register(request("1111111111", "Alpha")).await.unwrap();
    let Admission::Admitted(admitted) = first else { panic!("expected admission") };
    assert_eq!(admitted.counts.cohort("Alpha"), 1);
    assert_eq!(admitted.counts.cohort("Beta"), 0);
    assert_eq!(admitted.capacity.total_remaining, 1);
    assert_eq!(admitted.capacity.remaining_by_cohort["Alpha"], 0);
    assert_eq!(admitted.capacity.remaining_by_cohort["Beta"], 1);
    assert!(admitted.record.timestamp.ends_with('Z'));

    let second = h.booking.admission.register(request("2222222222", "Alpha")).await.unwrap();
    assert_eq!(rejection(&second).unwrap().to_string(), "Alpha cohort is full for this date.");

    assert_eq!(h.booking.ledger.load().await.len(), 1);
}

#[tokio::test]
async fn fields_are_trimmed_before_storing() {
    let h = harness(worked_example(), false).await;
    let mut req = request(" 1111111111 ", " Alpha ");
    req.name = "  Grace  ".into();

    assert!(h.booking.admission.register(req).await.unwrap().is_admitted());

    let stored = h.booking.ledger.load().await;
    assert_eq!(stored[0].name, "Grace");
    assert_eq!(stored[0].contact, "1111111111");
    assert_eq!(stored[0].cohort, "Alpha");
}

#[tokio::test]
async fn duplicate_rejection_is_idempotent() {
    let h = harness(worked_example(), false).await;
    assert!(h.booking.admission.register(request("1111111111", "Alpha")).await.unwrap().is_admitted());
    let before = h.booking.ledger.load().await;

    for cohort in ["Alpha", "Beta", "Alpha"] {
        let again = h.booking.admission.register(request("1111111111", cohort)).await.unwrap();
        assert_eq!(rejection(&again), Some(&Rejection::AlreadyBooked));
    }

    assert_eq!(h.booking.ledger.load().await, before);
}

#[tokio::test]
async fn static_checks_run_before_ledger_checks() {
    let h = harness(worked_example(), false).await;
    assert!(h.booking.admission.register(request("1111111111", "Alpha")).await.unwrap().is_admitted());

    let mut wrong_date = request("1111111111", "Alpha");
    wrong_date.date = "2024-01-02".into();
    let outcome = h.booking.admission.register(wrong_date).await.unwrap();
    assert_eq!(rejection(&outcome), Some(&Rejection::DateNotAllowed));

    let outcome = h.booking.admission.register(request("1111111111", "Gamma")).await.unwrap();
    assert_eq!(rejection(&outcome), Some(&Rejection::InvalidCohort));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_attempts_never_exceed_the_day_limit() {
    let h = harness(
        json!({
            "cohorts": ["Alpha", "Beta"],
            "perDayLimit": 5,
            "perCohortLimit": 100,
            "allowedDates": ["2024-01-01"],
        }),
        false,
    )
    .await;

    let mut tasks = JoinSet::new();
    for n in 0..20 {
        let booking = h.booking.clone();
        let cohort = if n % 2 == 0 { "Alpha" } else { "Beta" };
        tasks.spawn(async move { booking.admission.register(request(&contact(n), cohort)).await });
    }

    let mut admitted = 0;
    let mut day_full = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap().unwrap() {
            Admission::Admitted(_) => admitted += 1,
            Admission::Rejected(Rejection::DayFull { limit: 5 }) => day_full += 1,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    assert_eq!(admitted, 5);
    assert_eq!(day_full, 15);
    assert_eq!(h.booking.ledger.load().await.len(), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_attempts_never_exceed_the_cohort_limit() {
    let h = harness(
        json!({
            "cohorts": ["Alpha"],
            "perDayLimit": 100,
            "perCohortLimit": 3,
            "allowedDates": ["2024-01-01"],
        }),
        false,
    )
    .await;

    let mut tasks = JoinSet::new();
    for n in 0..12 {
        let booking = h.booking.clone();
        tasks.spawn(async move { booking.admission.register(request(&contact(n), "Alpha")).await });
    }

    let mut admitted = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap().unwrap() {
            Admission::Admitted(_) => admitted += 1,
            Admission::Rejected(rejection) => {
                assert_eq!(rejection.to_string(), "Alpha cohort is full for this date.");
            },
        }
    }
    assert_eq!(admitted, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicates_admit_once() {
    let h = harness(worked_example(), false).await;

    let mut tasks = JoinSet::new();
    for _ in 0..8 {
        let booking = h.booking.clone();
        tasks.spawn(async move { booking.admission.register(request("1111111111", "Beta")).await });
    }

    let mut admitted = 0;
    while let Some(joined) = tasks.join_next().await {
        if joined.unwrap().unwrap().is_admitted() {
            admitted += 1;
        }
    }
    assert_eq!(admitted, 1);
}

#[tokio::test]
async fn storage_failure_releases_the_lock() {
    let h = harness(worked_example(), false).await;
    let ledger_path = h.dir.path().join("registrations.json");
    std::fs::create_dir(&ledger_path).unwrap();

    let failed = h.booking.admission.register(request("1111111111", "Alpha")).await;
    assert!(failed.is_err());

    std::fs::remove_dir(&ledger_path).unwrap();
    let retried = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        h.booking.admission.register(request("1111111111", "Alpha")),
    )
    .await
    .expect("lock was not released")
    .unwrap();
    assert!(retried.is_admitted());
}

#[tokio::test]
async fn settings_changes_apply_without_restart() {
    let h = harness(worked_example(), false).await;
    assert!(h.booking.admission.register(request("1111111111", "Alpha")).await.unwrap().is_admitted());

    let mut raised = worked_example();
    raised["perCohortLimit"] = json!(5);
    h.storage.save_json("config.json", &raised).await.unwrap();

    assert!(h.booking.admission.register(request("2222222222", "Alpha")).await.unwrap().is_admitted());
}

#[tokio::test]
async fn reset_respects_the_switch() {
    let disabled = harness(worked_example(), false).await;
    assert!(disabled.booking.admission.register(request("1111111111", "Alpha")).await.unwrap().is_admitted());
    assert_eq!(disabled.booking.admission.reset().await.unwrap(), ResetOutcome::Disabled);
    assert_eq!(disabled.booking.ledger.load().await.len(), 1);

    let enabled = harness(worked_example(), true).await;
    assert!(enabled.booking.admission.register(request("1111111111", "Alpha")).await.unwrap().is_admitted());
    assert_eq!(enabled.booking.admission.reset().await.unwrap(), ResetOutcome::Cleared { removed: 1 });
    assert!(enabled.booking.ledger.load().await.is_empty());

    assert!(enabled.booking.admission.register(request("1111111111", "Alpha")).await.unwrap().is_admitted());
}

#[tokio::test]
async fn closed_dates_report_zero_without_reading_the_ledger() {
    let h = harness(worked_example(), false).await;
    assert!(h.booking.admission.register(request("1111111111", "Alpha")).await.unwrap().is_admitted());
    assert!(h.booking.admission.register(request("2222222222", "Beta")).await.unwrap().is_admitted());

    let mut closed = worked_example();
    closed["allowedDates"] = json!(["2024-02-01"]);
    h.storage.save_json("config.json", &closed).await.unwrap();

    let report = h.booking.admission.slots("2024-01-01").await;
    assert_eq!(report.closed, Some(Rejection::DateNotAllowed));
    assert_eq!(report.counts.total, 0);
    assert!(report.counts.per_cohort.values().all(|c| *c == 0));
    assert_eq!(report.capacity.total_remaining, 0);
    assert!(report.capacity.remaining_by_cohort.values().all(|r| *r == 0));
    assert_eq!(h.booking.ledger.load().await.len(), 2);

    let blank = h.booking.admission.slots("  ").await;
    assert_eq!(blank.closed, Some(Rejection::DateNotAllowed));
}

#[tokio::test]
async fn open_dates_report_remaining_capacity() {
    let h = harness(worked_example(), false).await;
    assert!(h.booking.admission.register(request("1111111111", "Beta")).await.unwrap().is_admitted());

    let report = h.booking.admission.slots("2024-01-01").await;
    assert!(report.closed.is_none());
    assert_eq!(report.counts.cohort("Beta"), 1);
    assert_eq!(report.capacity.total_remaining, 1);
    assert_eq!(report.capacity.remaining_by_cohort["Alpha"], 1);
    assert_eq!(report.per_day_limit, 2);
}

#[tokio::test]
async fn admissions_are_announced() {
    let h = harness(worked_example(), false).await;
    let mut rx = h.events.subscribe::<RegistrationAdmitted>().unwrap();

    let _ = h.booking.admission.register(request("3333333333", "Alpha")).await.unwrap();
    let _ = h.booking.admission.register(request("3333333333", "Alpha")).await.unwrap();

    let event = rx.next_event().await.unwrap();
    assert_eq!(event.record.contact, "3333333333");
    assert!(event.smtp.is_none());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn non_object_entries_are_skipped() {
    let h = harness(worked_example(), false).await;
    h.storage
        .save_json(
            "registrations.json",
            &json!([
                42,
                "stray",
                {
                    "timestamp": "2024-01-01T09:00:00.000Z", "name": "A", "college": "B",
                    "year": "1", "contact": "1111111111", "email": "a@b.c", "food": "Veg",
                    "date": "2024-01-01", "cohort": "Alpha"
                }
            ]),
        )
        .await
        .unwrap();

    let records = h.booking.ledger.load().await;
    assert_eq!(records.len(), 1);

    let outcome = h.booking.admission.register(request("1111111111", "Beta")).await.unwrap();
    assert_eq!(rejection(&outcome), Some(&Rejection::AlreadyBooked));
}

#[tokio::test]
async fn hand_edited_entries_still_block_and_survive_saves() {
    let h = harness(worked_example(), false).await;
    h.storage
        .save_json(
            "registrations.json",
            &json!([
                { "contact": "1111111111", "date": "2024-01-01", "cohort": "Alpha", "year": 3, "name": "Ada" }
            ]),
        )
        .await
        .unwrap();

    let outcome = h.booking.admission.register(request("1111111111", "Beta")).await.unwrap();
    assert_eq!(rejection(&outcome), Some(&Rejection::AlreadyBooked));

    assert!(h.booking.admission.register(request("2222222222", "Beta")).await.unwrap().is_admitted());

    let stored = h.booking.ledger.load().await;
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].contact, "1111111111");
    assert_eq!(stored[0].year, "3");
    assert_eq!(stored[0].food, "");
    assert_eq!(stored[1].contact, "2222222222");
}
