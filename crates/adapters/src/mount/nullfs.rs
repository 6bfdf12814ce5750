// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! nullfs mountpoints: bind-mount a host directory into a zone, optionally
//! read-only.

use super::{is_mounted, Handle, Mountpoint};
use crate::command::CommandRunner;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use zonys_core::{Error, Result};

pub struct NullfsMountpoint {
    source: PathBuf,
    destination: PathBuf,
    read_only: bool,
    runner: Arc<dyn CommandRunner>,
}

impl NullfsMountpoint {
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        read_only: bool,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            read_only,
            runner,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

impl Mountpoint for NullfsMountpoint {
    fn destination(&self) -> &Path {
        &self.destination
    }

    fn exists(&self) -> Result<bool> {
        is_mounted(&self.runner, &self.destination)
    }

    fn mount(&self) -> Result<Handle> {
        if self.exists()? {
            return Err(Error::AlreadyExists(self.destination.display().to_string()));
        }
        std::fs::create_dir_all(&self.destination)?;
        let mut argv = vec!["mount", "-t", "nullfs"];
        if self.read_only {
            argv.push("-o");
            argv.push("ro");
        }
        let source = self.source.to_string_lossy().to_string();
        let destination = self.destination.to_string_lossy().to_string();
        argv.push(&source);
        argv.push(&destination);
        self.runner.run_checked(&argv)?;
        Ok(Handle::new(self.destination.clone(), self.runner.clone()))
    }

    fn open(&self) -> Result<Handle> {
        if !self.exists()? {
            return Err(Error::NotFound(self.destination.display().to_string()));
        }
        Ok(Handle::new(self.destination.clone(), self.runner.clone()))
    }
}

#[cfg(test)]
#[path = "nullfs_tests.rs"]
mod tests;
