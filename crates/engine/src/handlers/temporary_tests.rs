// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::Arc;
use zonys_adapters::command::fake::FakeCommandRunner;

fn binding<'a>(options: &'a Value, configuration: &'a Value, base: &'a std::path::Path) -> CommitBinding<'a> {
    CommitBinding {
        options,
        configuration,
        base,
    }
}

#[test]
fn field_is_temporary() {
    assert_eq!(TemporaryHandler::new().field(), "temporary");
}

#[test]
fn true_at_after_stop_zone_requests_destroy() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = ZoneContext::new(Arc::new(FakeCommandRunner::new()));
    let options = Value::from(true);
    let configuration = zonys_core::value::empty_mapping();
    let b = binding(&options, &configuration, dir.path());

    TemporaryHandler::new()
        .on_commit(Phase::AfterStopZone, &b, &mut ctx, &options)
        .unwrap();
    assert!(ctx.destroy_requested);
}

#[test]
fn false_at_after_stop_zone_does_not_request_destroy() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = ZoneContext::new(Arc::new(FakeCommandRunner::new()));
    let options = Value::from(false);
    let configuration = zonys_core::value::empty_mapping();
    let b = binding(&options, &configuration, dir.path());

    TemporaryHandler::new()
        .on_commit(Phase::AfterStopZone, &b, &mut ctx, &options)
        .unwrap();
    assert!(!ctx.destroy_requested);
}

#[test]
fn ignores_other_phases() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = ZoneContext::new(Arc::new(FakeCommandRunner::new()));
    let options = Value::from(true);
    let configuration = zonys_core::value::empty_mapping();
    let b = binding(&options, &configuration, dir.path());

    TemporaryHandler::new()
        .on_commit(Phase::BeforeStopZone, &b, &mut ctx, &options)
        .unwrap();
    assert!(!ctx.destroy_requested);
}
