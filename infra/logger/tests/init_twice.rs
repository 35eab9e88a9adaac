use serial_test::serial;
use slotbook_logger::{LevelFilter, Logger, LoggerError};

#[test]
#[serial]
fn init_twice_returns_subscriber_error() {
    let first = Logger::builder("integration-init-twice")
        .level(LevelFilter::INFO)
        .init()
        .expect("first init should succeed");
    assert!(!first.writes_files(), "console-only logger should not create a file guard");

    let err = Logger::builder("integration-init-twice-second")
        .level(LevelFilter::INFO)
        .init()
        .expect_err("second init should fail");

    assert!(
        matches!(err, LoggerError::Subscriber { .. }),
        "expected subscriber error for second init"
    );
}
