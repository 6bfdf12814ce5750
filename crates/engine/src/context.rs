// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`ZoneContext`]: the per-operation context threaded through
//! [`zonys_config::Manager::commit`] calls for one zone lifecycle
//! operation (create, start, stop, destroy, or snapshot-create).
//!
//! A fresh context is built for each operation by [`crate::zone::Zone`];
//! handlers read the fields relevant to them and write back whatever the
//! next phase (or the caller, once `commit` returns) needs. See the
//! workspace spec's design notes for why this is one flat struct rather
//! than a `context: HashMap<String, Box<dyn Any>>`: every field handlers
//! can touch is named and typed up front.

use std::sync::Arc;
use zonys_adapters::command::CommandRunner;
use zonys_adapters::cow_fs::{FileSystem, Snapshot};
use zonys_adapters::jail::JailHandle;
use zonys_core::{value::empty_mapping, FileSystemIdentifier, Value};
use zonys_storage::Sidecar;

pub struct ZoneContext {
    /// The `CommandRunner` every handler shells out through.
    pub runner: Arc<dyn CommandRunner>,
    /// Set once the dataset for this operation is known (received, cloned,
    /// newly created, or opened for an existing zone).
    pub file_system: Option<FileSystem>,
    /// The target identifier a `create` operation's dataset must end up at.
    pub file_system_identifier: Option<FileSystemIdentifier>,
    /// The zone's persistence sidecar, open for mutation during `create`.
    pub persistence: Option<Sidecar>,
    /// The zone's jail, once created (`start`) or opened (`stop`).
    pub jail: Option<JailHandle>,
    /// Accumulated jail parameters, merged in by the `mount`/`network`/
    /// `jail` handlers during `before_start_zone`, consumed by the caller
    /// right after that commit to actually create the jail.
    pub jail_configuration: Value,
    /// Set by the `create-snapshot` caller before `before_create_snapshot`.
    pub snapshot_name: Option<String>,
    /// Set by the caller after the snapshot is actually taken, before
    /// `after_create_snapshot`.
    pub snapshot: Option<Snapshot>,
    /// Set by the `temporary` handler during `after_stop_zone`; the caller
    /// checks this after `stop()` completes to decide whether to also
    /// destroy the zone.
    pub destroy_requested: bool,
}

impl ZoneContext {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            file_system: None,
            file_system_identifier: None,
            persistence: None,
            jail: None,
            jail_configuration: empty_mapping(),
            snapshot_name: None,
            snapshot: None,
            destroy_requested: false,
        }
    }
}
