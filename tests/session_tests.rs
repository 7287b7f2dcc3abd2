use std::path::PathBuf;

use schg::config::Operation;
use schg::config_loader::load_config;
use schg::loader::LoadedNetwork;
use schg::network::{SchgError, State, SwitchingError};
use tempfile::tempdir;

fn fixture(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(relative)
}

#[test]
fn test_session_operations_drive_toggles() {
    let dir = tempdir().unwrap();
    let session = dir.path().join("session.yaml");
    std::fs::write(
        &session,
        format!(
            r#"
general:
  log_level: warn
network:
  path: {}
operations:
  - toggle: sw2
  - toggle: sw3
continue_on_rejection: true
"#,
            fixture("simple_plain/master.schg").display()
        ),
    )
    .unwrap();

    let config = load_config(&session).unwrap();
    assert_eq!(
        config.operations,
        vec![
            Operation::Toggle("sw2".to_string()),
            Operation::Toggle("sw3".to_string())
        ]
    );

    let mut loaded = LoadedNetwork::from_file(&config.network.path, config.network.dialect).unwrap();
    let verdicts: Vec<Vec<SwitchingError>> = config
        .operations
        .iter()
        .map(|op| match loaded.toggle(op.switch_name()) {
            Ok(()) => Vec::new(),
            Err(SchgError::Switching(rejected)) => rejected.into_reasons(),
            Err(other) => panic!("unexpected error: {}", other),
        })
        .collect();

    assert_eq!(
        verdicts,
        vec![
            vec![SwitchingError::OffloadSwitchingOnLoad],
            vec![
                SwitchingError::CausesMesh,
                SwitchingError::CausesSubstationsInterconnection
            ],
        ]
    );
    assert_eq!(loaded.switch("sw3").unwrap().state(), State::Off);
}

#[test]
fn test_session_network_path_is_relative_to_the_file() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("feeder.schg"),
        "sub onload on substation load\nload onload off\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("session.yaml"),
        "network:\n  path: feeder.schg\noperations:\n  - toggle: load\n",
    )
    .unwrap();

    let config = load_config(&dir.path().join("session.yaml")).unwrap();
    let mut loaded = LoadedNetwork::from_file(&config.network.path, None).unwrap();

    loaded.toggle(config.operations[0].switch_name()).unwrap();
    assert_eq!(loaded.switch("load").unwrap().state(), State::On);
}
