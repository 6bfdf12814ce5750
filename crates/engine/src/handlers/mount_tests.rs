// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::Arc;
use zonys_adapters::command::fake::FakeCommandRunner;

fn handler() -> MountHandler {
    MountHandler::new(Arc::new(FakeCommandRunner::new()))
}

fn mount_line(destination: &std::path::Path) -> String {
    format!("devfs on {} (devfs, local)", destination.display())
}

#[test]
fn field_is_mount() {
    assert_eq!(handler().field(), "mount");
}

#[test]
fn devfs_destination_rejects_relative_paths() {
    let dir = tempfile::tempdir().unwrap();
    let h = handler();
    let opts: Value = serde_yaml::from_str("path: dev").unwrap();
    let err = h.devfs_destination(dir.path(), &opts).unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration(_)));
}

#[test]
fn mount_devfs_mounts_and_unhides_requested_patterns() {
    let runner = Arc::new(FakeCommandRunner::new());
    let h = MountHandler::new(runner.clone());
    let dir = tempfile::tempdir().unwrap();

    runner.push_failure(""); // exists() -> is_mounted() -> `mount` listing empty
    runner.push_success(""); // mount -t devfs
    runner.push_success(""); // devfs ruleset 1 (hide_all)
    runner.push_success(""); // devfs rule add hide
    runner.push_success(""); // devfs rule add path null unhide

    let opts: Value = serde_yaml::from_str("path: /dev\ninclude: [null]").unwrap();
    h.mount_devfs(dir.path(), &opts).unwrap();

    let invocations = runner.invocations();
    assert!(invocations
        .iter()
        .any(|argv| argv[0] == "mount" && argv.contains(&"devfs".to_string())));
    let last = invocations.last().unwrap();
    assert_eq!(last[0], "devfs");
    assert_eq!(&last[3..], &["rule", "add", "path", "null", "unhide"]);
}

#[test]
fn unmount_devfs_is_a_noop_when_not_mounted() {
    let runner = Arc::new(FakeCommandRunner::new());
    let h = MountHandler::new(runner.clone());
    let dir = tempfile::tempdir().unwrap();

    runner.push_success(""); // `mount` listing, empty -> not mounted
    let opts: Value = serde_yaml::from_str("path: /dev").unwrap();
    h.unmount_devfs(dir.path(), &opts).unwrap();

    assert_eq!(runner.invocations().len(), 1);
}

#[test]
fn unmount_devfs_unmounts_when_present() {
    let runner = Arc::new(FakeCommandRunner::new());
    let h = MountHandler::new(runner.clone());
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("dev");

    runner.push_success(mount_line(&destination)); // is_mounted -> true
    runner.push_success(""); // umount

    let opts: Value = serde_yaml::from_str("path: /dev").unwrap();
    h.unmount_devfs(dir.path(), &opts).unwrap();

    let invocations = runner.invocations();
    assert_eq!(invocations.last().unwrap()[0], "umount");
}

#[test]
fn nullfs_mountpoint_requires_absolute_destination() {
    let dir = tempfile::tempdir().unwrap();
    let h = handler();
    let opts: Value = serde_yaml::from_str("source: /srv\ndestination: data").unwrap();
    let err = h.nullfs_mountpoint(dir.path(), &opts).unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration(_)));
}

#[test]
fn on_commit_before_start_zone_mounts_entries_and_returns_a_rollback_thunk() {
    let runner = Arc::new(FakeCommandRunner::new());
    let h = MountHandler::new(runner.clone());
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = ZoneContext::new(runner.clone());

    runner.push_failure(""); // devfs exists() -> false
    runner.push_success(""); // mount -t devfs
    runner.push_success(""); // ruleset 1
    runner.push_success(""); // rule add hide

    let options: Value = serde_yaml::from_str("[{devfs: {path: /dev}}]").unwrap();
    let configuration = zonys_core::value::empty_mapping();
    let binding = CommitBinding {
        options: &options,
        configuration: &configuration,
        base: dir.path(),
    };

    let thunk = h
        .on_commit(Phase::BeforeStartZone, &binding, &mut ctx, &options)
        .unwrap();
    assert!(thunk.is_some());

    runner.push_success(mount_line(&dir.path().join("dev"))); // rollback: is_mounted -> true
    runner.push_success(""); // rollback: umount

    (thunk.unwrap())().unwrap();
    assert_eq!(runner.invocations().last().unwrap()[0], "umount");
}

#[test]
fn on_commit_after_start_zone_without_a_jail_is_a_noop() {
    let runner = Arc::new(FakeCommandRunner::new());
    let h = MountHandler::new(runner.clone());
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = ZoneContext::new(runner.clone());

    let options: Value = serde_yaml::from_str("[{zfs: zroot/zonys/web}]").unwrap();
    let configuration = zonys_core::value::empty_mapping();
    let binding = CommitBinding {
        options: &options,
        configuration: &configuration,
        base: dir.path(),
    };

    let result = h
        .on_commit(Phase::AfterStartZone, &binding, &mut ctx, &options)
        .unwrap();
    assert!(result.is_none());
    assert!(runner.invocations().is_empty());
}

#[test]
fn on_commit_ignores_unrelated_phases() {
    let h = handler();
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = ZoneContext::new(Arc::new(FakeCommandRunner::new()));
    let options: Value = serde_yaml::from_str("[]").unwrap();
    let configuration = zonys_core::value::empty_mapping();
    let binding = CommitBinding {
        options: &options,
        configuration: &configuration,
        base: dir.path(),
    };
    let result = h
        .on_commit(Phase::BeforeCreateZone, &binding, &mut ctx, &options)
        .unwrap();
    assert!(result.is_none());
}
