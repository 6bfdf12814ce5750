// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The copy-on-write filesystem adapter: datasets and their snapshots.
//!
//! Every operation here shells out to the `zfs` utility through a
//! [`crate::command::CommandRunner`]; there is no in-process ZFS binding.

mod dataset;
mod snapshot;

pub use dataset::{Children, FileSystem, Snapshots};
pub use snapshot::Snapshot;
