// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::command::CommandRunner;
use crate::cow_fs::dataset::FileSystem;
use std::io::Write;
use std::sync::Arc;
use zonys_core::{Error, Result, SnapshotIdentifier};

/// A handle to an existing CoW-FS snapshot.
#[derive(Clone)]
pub struct Snapshot {
    identifier: SnapshotIdentifier,
    runner: Arc<dyn CommandRunner>,
}

impl Snapshot {
    pub(crate) fn from_parts(runner: Arc<dyn CommandRunner>, identifier: SnapshotIdentifier) -> Self {
        Self { identifier, runner }
    }

    pub fn identifier(&self) -> &SnapshotIdentifier {
        &self.identifier
    }

    pub fn path(&self) -> std::path::PathBuf {
        self.identifier.snapshot_path()
    }

    pub fn exists(runner: &Arc<dyn CommandRunner>, identifier: &SnapshotIdentifier) -> bool {
        runner
            .run(&["zfs", "list", "-H", "-o", "name", "-t", "snapshot", &identifier.to_string()])
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    pub fn create(runner: Arc<dyn CommandRunner>, identifier: SnapshotIdentifier) -> Result<Self> {
        if Self::exists(&runner, &identifier) {
            return Err(Error::AlreadyExists(identifier.to_string()));
        }
        runner.run_checked(&["zfs", "snapshot", &identifier.to_string()])?;
        Ok(Self { identifier, runner })
    }

    pub fn open(runner: Arc<dyn CommandRunner>, identifier: SnapshotIdentifier) -> Result<Self> {
        if !Self::exists(&runner, &identifier) {
            return Err(Error::NotFound(identifier.to_string()));
        }
        Ok(Self { identifier, runner })
    }

    pub fn file_system(&self) -> Result<FileSystem> {
        FileSystem::open(self.runner.clone(), self.identifier.dataset().clone())
    }

    pub fn destroy(&self) -> Result<()> {
        self.runner
            .run_checked(&["zfs", "destroy", &self.identifier.to_string()])?;
        Ok(())
    }

    /// Clone this snapshot into a new, independent dataset.
    pub fn clone_to(&self, new_identifier: zonys_core::FileSystemIdentifier) -> Result<FileSystem> {
        self.runner.run_checked(&[
            "zfs",
            "clone",
            &self.identifier.to_string(),
            &new_identifier.to_string(),
        ])?;
        FileSystem::open(self.runner.clone(), new_identifier)
    }

    pub fn rename(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        let new_identifier = SnapshotIdentifier::new(self.identifier.dataset().clone(), name);
        self.runner.run_checked(&[
            "zfs",
            "rename",
            &self.identifier.to_string(),
            &new_identifier.to_string(),
        ])?;
        self.identifier = new_identifier;
        Ok(())
    }

    /// Stream this snapshot's contents to `sink`.
    ///
    /// The native `zfs send` runs as a child process with its stdout
    /// redirected to one end of an anonymous pipe; the [`CommandRunner`]
    /// drains the other end in 8 KiB chunks into `sink` until EOF, then
    /// joins the child. This is the worker/parent split described for this
    /// operation, realized as a child process (the worker) plus the
    /// calling thread (the parent) rather than two threads, since the
    /// worker's job — running `zfs send` — is itself a subprocess call.
    pub fn send(&self, sink: &mut dyn Write, compress: bool) -> Result<()> {
        let mut argv = vec!["zfs", "send"];
        if compress {
            argv.push("-c");
        }
        let identifier = self.identifier.to_string();
        argv.push(&identifier);
        self.runner.run_checked_streaming_stdout(&argv, sink)
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
