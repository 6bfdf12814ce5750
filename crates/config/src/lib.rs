// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! zonys-config: the handler registry and configuration pipeline.
//!
//! A [`Handler`] binds a top-level field of a zone spec to a set of
//! optional lifecycle callbacks (attach, before/after-configuration,
//! normalize, commit, rollback). [`Manager::read`] walks a zone spec
//! against a fixed, ordered list of handlers, recording one [`Binding`] per
//! field present, and recursing into `before_configuration`/
//! `after_configuration` to expand includes and inherited bases.
//! [`Manager::commit`]/[`Manager::rollback`] then drive the per-phase
//! transaction described by the workspace spec's lifecycle transaction
//! manager.
//!
//! This crate knows nothing about zones, datasets, or jails — it is the
//! generic machinery. Concrete handlers (`variable`, `include`, `base`,
//! `provision`, `mount`, ...) and the context type they share live in
//! `zonys-engine`, which is the crate that actually needs the adapter layer
//! to do anything with a binding once it fires.

mod handler;
mod manager;
mod phase;

pub use handler::{CommitBinding, ConfigEvent, Handler, RollbackThunk};
pub use manager::{Binding, Manager};
pub use phase::Phase;

pub use zonys_core::{Error, Result, Value};
