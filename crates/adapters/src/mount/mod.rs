// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The mount adapter: devfs and nullfs mountpoint lifecycles, plus a parser
//! for the native `mount` utility's listing output.
//!
//! Every concrete mountpoint kind implements [`Mountpoint`]: `exists`,
//! `mount` (fails if already mounted), and `open` (attaches to an existing
//! mount without remounting). [`Handle::unmount`] releases via `umount`.

pub mod devfs;
pub mod nullfs;
mod parse;

pub use parse::{parse_mount_output, MountEntry};

use crate::command::CommandRunner;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use zonys_core::Result;

/// A not-yet-mounted (or possibly-mounted) destination.
pub trait Mountpoint {
    fn destination(&self) -> &Path;
    fn exists(&self) -> Result<bool>;
    fn mount(&self) -> Result<Handle>;
    fn open(&self) -> Result<Handle>;
}

/// A live mount. `unmount` is the only operation common to every kind.
pub struct Handle {
    destination: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl Handle {
    pub(crate) fn new(destination: PathBuf, runner: Arc<dyn CommandRunner>) -> Self {
        Self { destination, runner }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn unmount(&self) -> Result<()> {
        self.runner
            .run_checked(&["umount", &self.destination.to_string_lossy()])?;
        Ok(())
    }
}

/// List current mounts via the native `mount` utility and check whether
/// `destination` appears as a mounted-on path.
pub fn is_mounted(runner: &Arc<dyn CommandRunner>, destination: &Path) -> Result<bool> {
    let output = runner.run_checked(&["mount"])?;
    let entries = parse_mount_output(&String::from_utf8_lossy(&output));
    Ok(entries.iter().any(|e| e.destination == destination))
}
