// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::path::Path;
use std::sync::Arc;
use zonys_adapters::command::fake::FakeCommandRunner;
use zonys_core::value::empty_mapping;
use zonys_storage::Sidecar;

fn ctx() -> ZoneContext {
    ZoneContext::new(Arc::new(FakeCommandRunner::new()))
}

#[test]
fn field_is_name() {
    assert_eq!(NameHandler.field(), "name");
}

#[test]
fn commit_records_name_in_persistence() {
    let mut context = ctx();
    let dir = tempfile::tempdir().unwrap();
    context.persistence = Some(Sidecar::open(dir.path().join("zone.yaml")).unwrap());

    let options: Value = serde_yaml::from_str("\"my-zone\"").unwrap();
    let configuration = empty_mapping();
    let binding = CommitBinding {
        options: &options,
        configuration: &configuration,
        base: Path::new("/"),
    };
    NameHandler
        .on_commit(Phase::BeforeCreateZone, &binding, &mut context, &options)
        .unwrap();

    assert_eq!(
        context
            .persistence
            .unwrap()
            .data()
            .as_string_map()
            .get("name")
            .and_then(|v| v.as_str().map(str::to_string)),
        Some("my-zone".to_string())
    );
}

#[test]
fn commit_ignores_other_phases() {
    let mut context = ctx();
    let options: Value = serde_yaml::from_str("\"my-zone\"").unwrap();
    let configuration = empty_mapping();
    let binding = CommitBinding {
        options: &options,
        configuration: &configuration,
        base: Path::new("/"),
    };
    let result = NameHandler
        .on_commit(Phase::AfterCreateZone, &binding, &mut context, &options)
        .unwrap();
    assert!(result.is_none());
}
