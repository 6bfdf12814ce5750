// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::command::CommandRunner;
use crate::cow_fs::snapshot::Snapshot;
use std::io::Read;
use std::sync::Arc;
use zonys_core::{Error, FileSystemIdentifier, Result};

/// A handle to an existing (or newly created) CoW-FS dataset.
#[derive(Clone)]
pub struct FileSystem {
    identifier: FileSystemIdentifier,
    runner: Arc<dyn CommandRunner>,
}

impl FileSystem {
    pub fn identifier(&self) -> &FileSystemIdentifier {
        &self.identifier
    }

    pub fn path(&self) -> std::path::PathBuf {
        self.identifier.mountpoint()
    }

    pub fn exists(runner: &Arc<dyn CommandRunner>, identifier: &FileSystemIdentifier) -> bool {
        runner
            .run(&["zfs", "list", "-H", "-o", "name", &identifier.to_string()])
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Create a new dataset at `identifier`, creating ancestor datasets as needed.
    pub fn create(runner: Arc<dyn CommandRunner>, identifier: FileSystemIdentifier) -> Result<Self> {
        if Self::exists(&runner, &identifier) {
            return Err(Error::AlreadyExists(identifier.to_string()));
        }
        runner.run_checked(&["zfs", "create", "-p", &identifier.to_string()])?;
        Ok(Self { identifier, runner })
    }

    pub fn open(runner: Arc<dyn CommandRunner>, identifier: FileSystemIdentifier) -> Result<Self> {
        if !Self::exists(&runner, &identifier) {
            return Err(Error::NotFound(identifier.to_string()));
        }
        Ok(Self { identifier, runner })
    }

    pub fn is_mounted(&self) -> bool {
        self.runner
            .run(&[
                "zfs",
                "get",
                "-H",
                "-o",
                "value",
                "mounted",
                &self.identifier.to_string(),
            ])
            .map(|output| String::from_utf8_lossy(&output.stdout).trim() == "yes")
            .unwrap_or(false)
    }

    pub fn mount(&self) -> Result<()> {
        self.runner
            .run_checked(&["zfs", "mount", &self.identifier.to_string()])?;
        Ok(())
    }

    pub fn unmount(&self) -> Result<()> {
        self.runner
            .run_checked(&["zfs", "unmount", &self.identifier.to_string()])?;
        Ok(())
    }

    pub fn children(&self) -> Children {
        Children {
            identifier: self.identifier.clone(),
            runner: self.runner.clone(),
        }
    }

    pub fn snapshots(&self) -> Snapshots {
        Snapshots {
            identifier: self.identifier.clone(),
            runner: self.runner.clone(),
        }
    }

    /// Destroy the dataset: unmount if mounted, destroy all of its
    /// snapshots first, then destroy the dataset itself.
    pub fn destroy(&self) -> Result<()> {
        if self.is_mounted() {
            self.unmount()?;
        }
        self.snapshots().destroy_all()?;
        self.runner
            .run_checked(&["zfs", "destroy", &self.identifier.to_string()])?;
        Ok(())
    }

    /// Receive a send-stream into this (not-yet-existing) dataset.
    pub fn receive(
        runner: Arc<dyn CommandRunner>,
        identifier: FileSystemIdentifier,
        stream: &mut dyn Read,
    ) -> Result<Snapshot> {
        if Self::exists(&runner, &identifier) {
            return Err(Error::AlreadyExists(identifier.to_string()));
        }
        runner.run_checked_with_stdin(&["zfs", "receive", &identifier.to_string()], stream)?;
        let fs = Self::open(runner, identifier)?;
        fs.snapshots()
            .iter()?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound("received dataset has no snapshots".into()))
    }

    pub fn rename(&self, new_identifier: FileSystemIdentifier) -> Result<Self> {
        self.runner.run_checked(&[
            "zfs",
            "rename",
            &self.identifier.to_string(),
            &new_identifier.to_string(),
        ])?;
        Self::open(self.runner.clone(), new_identifier)
    }

    /// Attach this dataset to a running jail (`zfs jail`), so the jail may
    /// mount/unmount and manage its own child datasets.
    pub fn jail(&self, jail_name: &str) -> Result<()> {
        self.runner
            .run_checked(&["zfs", "jail", jail_name, &self.identifier.to_string()])?;
        Ok(())
    }

    pub fn unjail(&self, jail_name: &str) -> Result<()> {
        self.runner
            .run_checked(&["zfs", "unjail", jail_name, &self.identifier.to_string()])?;
        Ok(())
    }

    /// Enable the `jailed` property, required before `zfs jail` will accept
    /// this dataset.
    pub fn set_jailed(&self) -> Result<()> {
        self.runner
            .run_checked(&["zfs", "set", "jailed=on", &self.identifier.to_string()])?;
        Ok(())
    }

    /// Revert the `jailed` property back to its inherited value.
    pub fn inherit_jailed(&self) -> Result<()> {
        self.runner
            .run_checked(&["zfs", "inherit", "jailed", &self.identifier.to_string()])?;
        Ok(())
    }
}

pub struct Children {
    identifier: FileSystemIdentifier,
    runner: Arc<dyn CommandRunner>,
}

impl Children {
    pub fn contains(&self, name: &str) -> bool {
        FileSystem::exists(&self.runner, &self.identifier.child(name))
    }

    pub fn create(&self, name: &str) -> Result<FileSystem> {
        FileSystem::create(self.runner.clone(), self.identifier.child(name))
    }

    pub fn open(&self, name: &str) -> Result<FileSystem> {
        FileSystem::open(self.runner.clone(), self.identifier.child(name))
    }

    /// Iterate the dataset's immediate children.
    pub fn iter(&self) -> Result<Vec<FileSystem>> {
        let output = self.runner.run_checked(&[
            "zfs",
            "list",
            "-H",
            "-o",
            "name",
            "-d",
            "1",
            "-r",
            &self.identifier.to_string(),
        ])?;
        let self_name = self.identifier.to_string();
        String::from_utf8_lossy(&output)
            .lines()
            .filter(|line| *line != self_name)
            .map(|line| {
                FileSystem::open(self.runner.clone(), FileSystemIdentifier::parse(line)?)
            })
            .collect()
    }
}

pub struct Snapshots {
    identifier: FileSystemIdentifier,
    runner: Arc<dyn CommandRunner>,
}

impl Snapshots {
    pub fn contains(&self, name: &str) -> bool {
        Snapshot::exists(&self.runner, &self.identifier.snapshot(name))
    }

    pub fn create(&self, name: &str) -> Result<Snapshot> {
        Snapshot::create(self.runner.clone(), self.identifier.snapshot(name))
    }

    pub fn open(&self, name: &str) -> Result<Snapshot> {
        Snapshot::open(self.runner.clone(), self.identifier.snapshot(name))
    }

    pub fn destroy(&self, name: &str) -> Result<()> {
        self.open(name)?.destroy()
    }

    pub fn destroy_all(&self) -> Result<()> {
        for snapshot in self.iter()? {
            snapshot.destroy()?;
        }
        Ok(())
    }

    /// Iterate the dataset's snapshots, in the order `zfs list` reports them
    /// (creation order).
    pub fn iter(&self) -> Result<Vec<Snapshot>> {
        let output = self.runner.run_checked(&[
            "zfs",
            "list",
            "-t",
            "snapshot",
            "-H",
            "-o",
            "name",
            "-d",
            "1",
            &self.identifier.to_string(),
        ])?;
        String::from_utf8_lossy(&output)
            .lines()
            .map(|line| {
                Ok(Snapshot::from_parts(
                    self.runner.clone(),
                    zonys_core::SnapshotIdentifier::parse(line)?,
                ))
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "dataset_tests.rs"]
mod tests;
