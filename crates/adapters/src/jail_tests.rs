// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::command::fake::FakeCommandRunner;
use std::sync::Arc;

fn jls_empty() -> &'static str {
    r#"{"jail-information": {"jail": []}}"#
}

fn jls_with(name: &str) -> String {
    format!(r#"{{"jail-information": {{"jail": [{{"name": "{name}"}}]}}}}"#)
}

#[test]
fn exists_is_false_when_not_listed() {
    let runner = Arc::new(FakeCommandRunner::new());
    runner.push_success(jls_empty());
    let id = JailIdentifier::new("abc", runner);
    assert!(!id.exists().unwrap());
}

#[test]
fn exists_is_true_when_listed() {
    let runner = Arc::new(FakeCommandRunner::new());
    runner.push_success(jls_with("abc"));
    let id = JailIdentifier::new("abc", runner);
    assert!(id.exists().unwrap());
}

#[test]
fn create_renders_params_and_required_flags() {
    let runner = Arc::new(FakeCommandRunner::new());
    runner.push_success(jls_empty()); // exists check
    runner.push_success(""); // jail -c
    let id = JailIdentifier::new("myzone", runner.clone());
    let params: Vec<(&str, JailParam)> = vec![("allow.raw_sockets", false.into()), ("ip4", "inherit".into())];
    id.create(Path::new("/zroot/zonys/zone/myzone"), &params).unwrap();
    let invocations = runner.invocations();
    let create_call = invocations.last().unwrap();
    assert!(create_call.contains(&"exec.clean".to_string()));
    assert!(create_call.contains(&"name=myzone".to_string()));
    assert!(create_call.contains(&"ip4=inherit".to_string()));
    assert!(create_call.contains(&"persist".to_string()));
    // caller-supplied allow.raw_sockets=0 coexists with the unconditional
    // allow.raw_sockets=1 appended at the end; both render, last wins in `jail -c`.
    assert!(create_call.contains(&"allow.raw_sockets=0".to_string()));
    assert!(create_call.contains(&"allow.raw_sockets=1".to_string()));
}

#[test]
fn create_fails_if_already_exists() {
    let runner = Arc::new(FakeCommandRunner::new());
    runner.push_success(jls_with("myzone"));
    let id = JailIdentifier::new("myzone", runner);
    assert!(id.create(Path::new("/zroot/zonys/zone/myzone"), &[]).is_err());
}

#[test]
fn execute_runs_via_jexec_dash_l() {
    let runner = Arc::new(FakeCommandRunner::new());
    runner.push_success("output");
    let handle = JailHandle {
        name: "myzone".into(),
        runner: runner.clone(),
    };
    handle.execute(&["echo", "hi"]).unwrap();
    let invocations = runner.invocations();
    assert_eq!(
        invocations.last().unwrap(),
        &vec!["jexec", "-l", "myzone", "echo", "hi"]
    );
}

#[test]
fn destroy_runs_jail_dash_r() {
    let runner = Arc::new(FakeCommandRunner::new());
    runner.push_success("");
    let handle = JailHandle {
        name: "myzone".into(),
        runner: runner.clone(),
    };
    handle.destroy().unwrap();
    assert_eq!(
        runner.invocations().last().unwrap(),
        &vec!["jail", "-r", "myzone"]
    );
}
