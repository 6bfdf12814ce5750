use super::*;
use crate::command::fake::FakeCommandRunner;
use std::sync::Arc;

fn runner() -> Arc<FakeCommandRunner> {
    Arc::new(FakeCommandRunner::new())
}

fn id(s: &str) -> FileSystemIdentifier {
    FileSystemIdentifier::parse(s).unwrap()
}

#[test]
fn create_fails_when_dataset_already_exists() {
    let runner = runner();
    runner.push_success(""); // exists() check for create()
    let dyn_runner: Arc<dyn CommandRunner> = runner;
    let err = FileSystem::create(dyn_runner, id("zroot/zonys")).unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));
}

#[test]
fn create_runs_zfs_create_with_ancestors() {
    let runner = runner();
    runner.push_failure(""); // exists() -> false
    runner.push_success(""); // zfs create
    let dyn_runner: Arc<dyn CommandRunner> = runner.clone();
    let fs = FileSystem::create(dyn_runner, id("zroot/zonys/web")).unwrap();
    assert_eq!(fs.identifier().to_string(), "zroot/zonys/web");
    let invocations = runner.invocations();
    assert_eq!(invocations[1], vec!["zfs", "create", "-p", "zroot/zonys/web"]);
}

#[test]
fn open_fails_when_dataset_is_missing() {
    let runner = runner();
    runner.push_failure("");
    let dyn_runner: Arc<dyn CommandRunner> = runner;
    let err = FileSystem::open(dyn_runner, id("zroot/zonys/web")).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn destroy_unmounts_before_destroying_when_mounted() {
    let runner = runner();
    runner.push_success(""); // exists() in open()
    let dyn_runner: Arc<dyn CommandRunner> = runner.clone();
    let fs = FileSystem::open(dyn_runner, id("zroot/zonys/web")).unwrap();

    runner.push_success("yes"); // is_mounted()
    runner.push_success(""); // unmount
    runner.push_success(""); // snapshots list (empty)
    runner.push_success(""); // destroy

    fs.destroy().unwrap();

    let invocations = runner.invocations();
    assert!(invocations.iter().any(|i| i[1] == "unmount"));
    assert_eq!(invocations.last().unwrap()[1], "destroy");
}

#[test]
fn rename_reopens_at_the_new_identifier() {
    let runner = runner();
    runner.push_success(""); // open() exists check
    let dyn_runner: Arc<dyn CommandRunner> = runner.clone();
    let fs = FileSystem::open(dyn_runner, id("zroot/zonys/old")).unwrap();

    runner.push_success(""); // zfs rename
    runner.push_success(""); // open() exists check on new identifier
    let renamed = fs.rename(id("zroot/zonys/new")).unwrap();
    assert_eq!(renamed.identifier().to_string(), "zroot/zonys/new");
}

#[test]
fn set_jailed_and_inherit_jailed_run_the_expected_zfs_commands() {
    let runner = runner();
    runner.push_success(""); // open() exists check
    let dyn_runner: Arc<dyn CommandRunner> = runner.clone();
    let fs = FileSystem::open(dyn_runner, id("zroot/zonys/web")).unwrap();

    runner.push_success("");
    fs.set_jailed().unwrap();
    runner.push_success("");
    fs.inherit_jailed().unwrap();

    let invocations = runner.invocations();
    assert_eq!(invocations[1], vec!["zfs", "set", "jailed=on", "zroot/zonys/web"]);
    assert_eq!(invocations[2], vec!["zfs", "inherit", "jailed", "zroot/zonys/web"]);
}
