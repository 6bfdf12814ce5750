// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use zonys_adapters::command::fake::FakeCommandRunner;

fn jls_json(names: &[&str]) -> String {
    let entries: Vec<String> = names.iter().map(|n| format!(r#"{{"name":"{n}"}}"#)).collect();
    format!(r#"{{"jail-information":{{"jail":[{}]}}}}"#, entries.join(","))
}

fn namespace_fs(runner: Arc<dyn CommandRunner>, identifier: FileSystemIdentifier) -> FileSystem {
    FileSystem::open(runner, identifier).unwrap()
}

fn plain_namespace() -> FileSystemIdentifier {
    FileSystemIdentifier::parse("testpool/zonys-store-tests").unwrap()
}

#[test]
fn open_creates_and_mounts_the_zone_dataset_when_missing() {
    let runner = Arc::new(FakeCommandRunner::new());
    runner.push_success(""); // FileSystem::open(namespace) exists check
    let ns = namespace_fs(runner.clone(), plain_namespace());

    runner.push_failure(""); // children.contains("zone") -> false
    runner.push_failure(""); // children.create("zone") -> internal exists() check -> false
    runner.push_success(""); // children.create("zone") -> zfs create
    runner.push_success("no"); // is_mounted() -> not mounted
    runner.push_success(""); // mount()
    runner.push_success(""); // children().iter() -> zfs list -d1 -r (no existing zones)

    let store = ZoneStore::open(runner.clone(), &ns).unwrap();
    assert!(store.is_empty());
    assert_eq!(store.zone_root().to_string(), "testpool/zonys-store-tests/zone");

    let invocations = runner.invocations();
    assert!(invocations.iter().any(|argv| argv.contains(&"create".to_string())));
    assert!(invocations.iter().any(|argv| argv.contains(&"mount".to_string())));
}

#[test]
fn open_indexes_existing_zone_children_in_discovery_order() {
    let runner = Arc::new(FakeCommandRunner::new());
    runner.push_success(""); // namespace FileSystem::open exists check
    let ns = namespace_fs(runner.clone(), plain_namespace());

    runner.push_success(""); // children.contains("zone") -> true
    runner.push_success(""); // children.open("zone") -> exists() check
    runner.push_success("yes"); // is_mounted() -> already mounted

    let uuid_a = "11111111-1111-1111-1111-111111111111";
    let uuid_b = "22222222-2222-2222-2222-222222222222";
    runner.push_success(format!(
        "testpool/zonys-store-tests/zone/{uuid_a}\ntestpool/zonys-store-tests/zone/{uuid_b}\n"
    )); // children().iter() -> zfs list -d1 -r
    runner.push_success(""); // Children::iter()'s own FileSystem::open(uuid_a) -> exists
    runner.push_success(""); // Children::iter()'s own FileSystem::open(uuid_b) -> exists
    runner.push_success(""); // Zone::open(uuid_a) -> FileSystem::exists
    runner.push_success(""); // Zone::open(uuid_b) -> FileSystem::exists

    let store = ZoneStore::open(runner, &ns).unwrap();
    assert_eq!(store.len(), 2);
    let listed: Vec<&str> = store.list().iter().map(|z| z.uuid()).collect();
    assert_eq!(listed, vec![uuid_a, uuid_b]);
    assert!(store.get(uuid_a).is_some());
    assert!(store.match_one(&uuid_a[..8]).is_ok());
}

#[test]
fn match_prefix_is_ambiguous_across_two_zones_sharing_a_prefix() {
    let runner = Arc::new(FakeCommandRunner::new());
    runner.push_success(""); // namespace open
    let ns = namespace_fs(runner.clone(), plain_namespace());

    runner.push_success(""); // contains("zone")
    runner.push_success(""); // open("zone")
    runner.push_success("yes"); // is_mounted

    runner.push_success("testpool/zonys-store-tests/zone/aaa111\ntestpool/zonys-store-tests/zone/aaa222\n");
    runner.push_success(""); // Children::iter() FileSystem::open(aaa111) -> exists
    runner.push_success(""); // Children::iter() FileSystem::open(aaa222) -> exists
    runner.push_success(""); // Zone::open(aaa111)
    runner.push_success(""); // Zone::open(aaa222)

    let store = ZoneStore::open(runner, &ns).unwrap();
    assert_eq!(store.match_prefix("aaa").len(), 2);
    let err = store.match_one("aaa").unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));
}

#[test]
fn create_propagates_dataset_already_exists_and_rolls_back() {
    let runner = Arc::new(FakeCommandRunner::new());
    runner.push_success(""); // namespace open
    let ns = namespace_fs(runner.clone(), plain_namespace());
    runner.push_success(""); // contains("zone")
    runner.push_success(""); // open("zone")
    runner.push_success("yes"); // is_mounted
    runner.push_success(""); // children().iter() -> no existing zones

    let mut store = ZoneStore::open(runner.clone(), &ns).unwrap();

    // FileSystem::create's internal exists() check reports the target
    // dataset already present, so create() never reaches persistence.flush()
    // or create_snapshot — it unwinds through the rollback/cleanup path.
    runner.push_success(""); // FileSystem::create -> exists() -> true
    runner.push_success(""); // cleanup: FileSystem::exists(target) -> true
    runner.push_success(""); // cleanup: FileSystem::open(target) -> exists() -> true
    runner.push_success("no"); // cleanup: fs.destroy() -> is_mounted() -> false
    runner.push_success(""); // cleanup: fs.destroy() -> snapshots().iter() -> empty
    runner.push_success(""); // cleanup: fs.destroy() -> zfs destroy

    let err = store.create(zonys_core::value::empty_mapping()).unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));
    assert!(store.is_empty());
}

#[test]
fn autostart_is_a_noop_when_no_zone_requests_it() {
    let runner = Arc::new(FakeCommandRunner::new());
    runner.push_success(""); // namespace open
    let ns = namespace_fs(runner.clone(), plain_namespace());
    runner.push_success(""); // contains("zone")
    runner.push_success(""); // open("zone")
    runner.push_success("yes"); // is_mounted

    let uuid = "99999999-9999-9999-9999-999999999999";
    runner.push_success(format!("testpool/zonys-store-tests/zone/{uuid}\n"));
    runner.push_success(""); // Children::iter() FileSystem::open -> exists
    runner.push_success(""); // Zone::open -> exists

    let store = ZoneStore::open(runner.clone(), &ns).unwrap();
    assert_eq!(store.len(), 1);

    let before = runner.invocations().len();
    store.autostart().unwrap();
    let invocations = runner.invocations();
    assert_eq!(invocations.len(), before, "a zone with no autostart flag must not be started");
    assert!(!invocations
        .iter()
        .any(|argv| argv.first().map(String::as_str) == Some("jail") && argv.contains(&"-c".to_string())));
}

#[test]
fn destroy_removes_the_zone_from_the_index_once_its_dataset_is_gone() {
    let runner = Arc::new(FakeCommandRunner::new());
    runner.push_success(""); // namespace open
    let ns = namespace_fs(runner.clone(), plain_namespace());
    runner.push_success(""); // contains("zone")
    runner.push_success(""); // open("zone")
    runner.push_success("yes"); // is_mounted

    let uuid = "33333333-3333-3333-3333-333333333333";
    runner.push_success(format!("testpool/zonys-store-tests/zone/{uuid}\n"));
    runner.push_success(""); // Children::iter() FileSystem::open -> exists
    runner.push_success(""); // Zone::open -> exists

    let mut store = ZoneStore::open(runner.clone(), &ns).unwrap();
    assert_eq!(store.len(), 1);

    runner.push_success(jls_json(&[])); // zone.is_running() -> not running
    runner.push_success(""); // zone.file_system() -> FileSystem::open -> exists
    runner.push_success("no"); // fs.destroy() -> is_mounted -> false
    runner.push_success(""); // fs.destroy() -> snapshots().iter() -> empty
    runner.push_success(""); // fs.destroy() -> zfs destroy
    runner.push_failure(""); // sync_after: FileSystem::exists(zone) -> false, dataset is gone

    store.destroy(uuid).unwrap();
    assert!(store.is_empty());
}
