// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use zonys_adapters::command::fake::FakeCommandRunner;

fn zone_root() -> FileSystemIdentifier {
    FileSystemIdentifier::parse("testpool/zonys-zone-tests/zone").unwrap()
}

fn jls_json(names: &[&str]) -> String {
    let entries: Vec<String> = names.iter().map(|n| format!(r#"{{"name":"{n}"}}"#)).collect();
    format!(r#"{{"jail-information":{{"jail":[{}]}}}}"#, entries.join(","))
}

fn push_not_running(runner: &FakeCommandRunner) {
    runner.push_success(jls_json(&[]));
}

fn push_running(runner: &FakeCommandRunner, uuid: &str) {
    runner.push_success(jls_json(&[uuid]));
}

fn open_zone(runner: Arc<FakeCommandRunner>, uuid: &str) -> Zone {
    Zone::open(runner, zone_root(), uuid).unwrap()
}

/// A zone built directly from an in-memory sidecar (via a tempdir path that
/// is never written to), so tests can exercise `local_spec`/`entities`/
/// `merged_configuration` without touching the real `/` filesystem that
/// `FileSystemIdentifier::mountpoint` always resolves against.
fn zone_with_sidecar(runner: Arc<FakeCommandRunner>, zone_root: &FileSystemIdentifier, uuid: &str, yaml: &str) -> Zone {
    let dir = tempfile::tempdir().unwrap();
    let mut sidecar = Sidecar::open(dir.path().join("sidecar.yaml")).unwrap();
    sidecar.set_data(serde_yaml::from_str(yaml).unwrap());
    Zone::from_parts(runner, zone_root.clone(), zone_root.child(uuid), sidecar)
}

#[test]
fn uuid_and_identifier_match_the_opened_child() {
    let runner = Arc::new(FakeCommandRunner::new());
    let uuid = Uuid::new_v4().to_string();
    let zone = open_zone(runner, &uuid);
    assert_eq!(zone.uuid(), uuid);
    assert_eq!(zone.identifier(), &zone_root().child(&uuid));
    assert_eq!(zone.path(), zone_root().child(&uuid).mountpoint());
}

#[test]
fn display_identifier_falls_back_to_uuid_without_a_name() {
    let runner = Arc::new(FakeCommandRunner::new());
    let uuid = Uuid::new_v4().to_string();
    let zone = open_zone(runner, &uuid);
    assert_eq!(zone.display_identifier(), uuid);
}

#[test]
fn display_identifier_prefers_the_recorded_name() {
    let runner = Arc::new(FakeCommandRunner::new());
    let root = zone_root();
    let zone = zone_with_sidecar(runner, &root, "child-uuid", "name: web\n");
    assert_eq!(zone.display_identifier(), "web");
    assert_eq!(zone.name(), Some("web".to_string()));
}

#[test]
fn local_spec_merged_configuration_and_entities_with_no_lineage() {
    let runner = Arc::new(FakeCommandRunner::new());
    let root = zone_root();
    let zone = zone_with_sidecar(
        runner,
        &root,
        "leaf-uuid",
        "local:\n  autostart: true\n",
    );

    assert_eq!(
        zone.local_spec()
            .as_string_map()
            .get("autostart")
            .and_then(|v| v.as_bool()),
        Some(true)
    );
    assert!(zone.base_uuid().is_none());
    assert!(zone.parent().unwrap().is_none());
    assert_eq!(zone.entities().unwrap().len(), 1);
    assert!(zone.auto_start().unwrap());
    assert_eq!(zone.merged_configuration().unwrap(), zone.local_spec());
}

#[test]
fn auto_start_defaults_to_false() {
    let runner = Arc::new(FakeCommandRunner::new());
    let uuid = Uuid::new_v4().to_string();
    let zone = open_zone(runner, &uuid);
    assert!(!zone.auto_start().unwrap());
}

#[test]
fn is_running_reflects_the_jail_table() {
    let runner = Arc::new(FakeCommandRunner::new());
    let uuid = Uuid::new_v4().to_string();
    push_not_running(&runner);
    let zone = open_zone(runner.clone(), &uuid);
    assert!(!zone.is_running().unwrap());

    push_running(&runner, &uuid);
    assert!(zone.is_running().unwrap());
}

#[test]
fn start_fails_when_already_running() {
    let runner = Arc::new(FakeCommandRunner::new());
    let uuid = Uuid::new_v4().to_string();
    push_running(&runner, &uuid);
    let zone = open_zone(runner, &uuid);
    let err = zone.start().unwrap_err();
    assert!(matches!(err, Error::AlreadyRunning(_)));
}

#[test]
fn start_creates_a_jail_when_not_already_running() {
    let runner = Arc::new(FakeCommandRunner::new());
    let uuid = Uuid::new_v4().to_string();
    push_not_running(&runner); // Zone::start's own is_running() check
    push_not_running(&runner); // JailIdentifier::create's internal exists() check
    let zone = open_zone(runner.clone(), &uuid);
    zone.start().unwrap();

    let invocations = runner.invocations();
    assert!(invocations
        .iter()
        .any(|argv| argv.first().map(String::as_str) == Some("jail") && argv.contains(&"-c".to_string())));
}

#[test]
fn stop_fails_when_not_running() {
    let runner = Arc::new(FakeCommandRunner::new());
    let uuid = Uuid::new_v4().to_string();
    push_not_running(&runner);
    let zone = open_zone(runner, &uuid);
    let err = zone.stop().unwrap_err();
    assert!(matches!(err, Error::NotRunning(_)));
}

#[test]
fn stop_destroys_the_jail_when_running() {
    let runner = Arc::new(FakeCommandRunner::new());
    let uuid = Uuid::new_v4().to_string();
    push_running(&runner, &uuid); // Zone::stop's own is_running() check
    push_running(&runner, &uuid); // JailIdentifier::open's internal exists() check
    let zone = open_zone(runner.clone(), &uuid);
    zone.stop().unwrap();

    let invocations = runner.invocations();
    assert!(invocations
        .iter()
        .any(|argv| argv.first().map(String::as_str) == Some("jail") && argv.contains(&"-r".to_string())));
}

#[test]
fn destroy_fails_when_running() {
    let runner = Arc::new(FakeCommandRunner::new());
    let uuid = Uuid::new_v4().to_string();
    push_running(&runner, &uuid);
    let zone = open_zone(runner, &uuid);
    let err = zone.destroy().unwrap_err();
    assert!(matches!(err, Error::Running(_)));
}

#[test]
fn destroy_succeeds_when_stopped() {
    let runner = Arc::new(FakeCommandRunner::new());
    let uuid = Uuid::new_v4().to_string();
    push_not_running(&runner);
    let zone = open_zone(runner.clone(), &uuid);
    zone.destroy().unwrap();

    let invocations = runner.invocations();
    assert!(invocations
        .iter()
        .any(|argv| argv.first().map(String::as_str) == Some("zfs") && argv.contains(&"destroy".to_string())));
}

#[test]
fn destroy_snapshot_runs_the_destroy_phase_and_removes_it() {
    let runner = Arc::new(FakeCommandRunner::new());
    let uuid = Uuid::new_v4().to_string();
    push_not_running(&runner);
    let zone = open_zone(runner.clone(), &uuid);
    zone.destroy_snapshot("send-test").unwrap();

    let invocations = runner.invocations();
    assert!(invocations.iter().any(|argv| argv.first().map(String::as_str) == Some("zfs")
        && argv.contains(&"destroy".to_string())
        && argv.iter().any(|a| a.ends_with("@send-test"))));
}

#[test]
fn up_is_a_noop_when_already_running() {
    let runner = Arc::new(FakeCommandRunner::new());
    let uuid = Uuid::new_v4().to_string();
    push_running(&runner, &uuid);
    let zone = open_zone(runner.clone(), &uuid);
    zone.up().unwrap();
    assert_eq!(runner.invocations().len(), 1);
}

#[test]
fn down_is_a_noop_when_already_stopped() {
    let runner = Arc::new(FakeCommandRunner::new());
    let uuid = Uuid::new_v4().to_string();
    push_not_running(&runner);
    let zone = open_zone(runner.clone(), &uuid);
    zone.down().unwrap();
    assert_eq!(runner.invocations().len(), 1);
}

#[test]
fn execute_io_and_console_require_a_running_zone() {
    let runner = Arc::new(FakeCommandRunner::new());
    let uuid = Uuid::new_v4().to_string();
    push_not_running(&runner);
    let zone = open_zone(runner, &uuid);
    let err = zone.console().unwrap_err();
    assert!(matches!(err, Error::NotRunning(_)));
}
