// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! devfs mountpoints: mounted with every device entry hidden by default, then
//! selectively unhidden via the `devfs.rules` ruleset mechanism through a
//! [`Rules`] handle.

use super::{is_mounted, Handle, Mountpoint};
use crate::command::CommandRunner;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use zonys_core::{Error, Result};

/// A devfs mountpoint bound to a dedicated ruleset number so its hide/unhide
/// rules don't collide with any other devfs mount on the host.
pub struct DevfsMountpoint {
    destination: PathBuf,
    ruleset: u16,
    runner: Arc<dyn CommandRunner>,
}

impl DevfsMountpoint {
    pub fn new(destination: impl Into<PathBuf>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            destination: destination.into(),
            ruleset: 1000,
            runner,
        }
    }

    pub fn with_ruleset(mut self, ruleset: u16) -> Self {
        self.ruleset = ruleset;
        self
    }
}

impl Mountpoint for DevfsMountpoint {
    fn destination(&self) -> &Path {
        &self.destination
    }

    fn exists(&self) -> Result<bool> {
        is_mounted(&self.runner, &self.destination)
    }

    /// Mount, then immediately hide every entry in the dedicated ruleset —
    /// matching the source's "all entries hidden by default" behavior.
    fn mount(&self) -> Result<Handle> {
        if self.exists()? {
            return Err(Error::AlreadyExists(self.destination.display().to_string()));
        }
        std::fs::create_dir_all(&self.destination)?;
        self.runner.run_checked(&[
            "mount",
            "-t",
            "devfs",
            "-o",
            &format!("ruleset={}", self.ruleset),
            "devfs",
            &self.destination.to_string_lossy(),
        ])?;
        Rules::new(self.destination.clone(), self.runner.clone()).hide_all()?;
        Ok(Handle::new(self.destination.clone(), self.runner.clone()))
    }

    fn open(&self) -> Result<Handle> {
        if !self.exists()? {
            return Err(Error::NotFound(self.destination.display().to_string()));
        }
        Ok(Handle::new(self.destination.clone(), self.runner.clone()))
    }
}

/// Issues `devfs rule` edits scoped to one mounted devfs instance.
pub struct Rules {
    destination: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl Rules {
    pub fn new(destination: impl Into<PathBuf>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            destination: destination.into(),
            runner,
        }
    }

    fn run(&self, args: &[&str]) -> Result<()> {
        let dest = self.destination.to_string_lossy().to_string();
        let mut argv = vec!["devfs", "-m", dest.as_str()];
        argv.extend(args);
        self.runner.run_checked(&argv)?;
        Ok(())
    }

    pub fn hide_all(&self) -> Result<()> {
        self.run(&["ruleset", "1"])?;
        self.run(&["rule", "add", "hide"])
    }

    pub fn unhide_all(&self) -> Result<()> {
        self.run(&["rule", "add", "unhide"])
    }

    /// Unhide entries matching `pattern` (e.g. `"null"`, `"pts/*"`).
    pub fn unhide(&self, pattern: &str) -> Result<()> {
        self.run(&["rule", "add", "path", pattern, "unhide"])
    }

    /// Re-hide entries matching `pattern`.
    pub fn hide(&self, pattern: &str) -> Result<()> {
        self.run(&["rule", "add", "path", pattern, "hide"])
    }
}

impl Handle {
    /// Access the ruleset API for a devfs handle. Not meaningful for other
    /// mountpoint kinds, so kept here rather than on the shared [`Handle`]
    /// surface.
    pub fn rules(&self) -> Rules {
        Rules::new(self.destination().to_path_buf(), self.runner.clone())
    }
}

#[cfg(test)]
#[path = "devfs_tests.rs"]
mod tests;
