use slotbook_kernel::config::{load_config, load_config_with_env};
use slotbook_kernel::domain::config::ApiConfig;
use std::fs;

fn env(pairs: &[(&str, &str)]) -> config::Map<String, String> {
    pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg: ApiConfig =
        load_config_with_env(Some(dir.path().join("absent.toml")), env(&[])).unwrap();

    assert_eq!(cfg.server.port, 4583);
    assert!(!cfg.booking.allow_reset);
}

#[test]
fn file_values_are_applied() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.toml");
    fs::write(&path, "[server]\nport = 8080\n\n[storage]\ndata_dir = \"/srv/slots\"\n").unwrap();

    let cfg: ApiConfig = load_config(Some(&path)).unwrap();
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.storage.data_dir.to_str(), Some("/srv/slots"));
    assert_eq!(cfg.booking.ledger_file.to_str(), Some("registrations.json"));
}

#[test]
fn environment_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.toml");
    fs::write(&path, "[booking]\nallow_reset = false\n").unwrap();

    let cfg: ApiConfig = load_config_with_env(
        Some(&path),
        env(&[("SLOTBOOK__BOOKING__ALLOW_RESET", "true"), ("SLOTBOOK__SERVER__PORT", "9000")]),
    )
    .unwrap();

    assert!(cfg.booking.allow_reset);
    assert_eq!(cfg.server.port, 9000);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.toml");
    fs::write(&path, "[server]\nport = \"not a number\"\n").unwrap();

    assert!(load_config::<ApiConfig>(Some(&path)).is_err());
}
