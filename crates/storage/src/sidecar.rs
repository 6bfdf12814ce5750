// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A YAML-backed sidecar file: loads on construction, behaves as an
//! in-memory mapping until explicitly [`Sidecar::flush`]ed or
//! [`Sidecar::destroy`]ed.
//!
//! Used for the three sidecar shapes the engine persists: a zone's
//! `<uuid>.yaml` (`name`/`base`/`local`), a namespace's `zonys.core.yaml`,
//! and a snapshot's in-dataset `.zonys.yaml` (the merged spec at snapshot
//! time).

use std::path::{Path, PathBuf};
use zonys_core::{value::empty_mapping, Result, Value};

#[derive(Debug, Clone)]
pub struct Sidecar {
    path: PathBuf,
    data: Value,
}

impl Sidecar {
    /// Load `path` if it exists, otherwise start from an empty mapping.
    /// Never writes to disk by itself — call [`Sidecar::flush`] to persist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_yaml::from_str(&contents)?
        } else {
            empty_mapping()
        };
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Value {
        &mut self.data
    }

    pub fn set_data(&mut self, data: Value) {
        self.data = data;
    }

    /// Overwrite the file on disk with the current in-memory data.
    pub fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_yaml::to_string(&self.data)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    /// Remove the file if present. Idempotent.
    pub fn destroy(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "sidecar_tests.rs"]
mod tests;
