// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The error kinds shared across the `zonys` crates.
//!
//! Every fallible operation in the configuration pipeline, the lifecycle
//! transaction manager, and the adapter layer surfaces one of these variants.
//! See the module docs of [`crate`] for how rollback interacts with these
//! errors.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Schema validation failure, or a structural check inside a handler
    /// (absolute path required, name missing, etc.).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A parsed identifier did not have the expected shape.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// An identifier-based resource already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// An identifier-based resource could not be found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A lifecycle operation required the zone to be stopped.
    #[error("already running: {0}")]
    AlreadyRunning(String),

    /// A lifecycle operation required the zone to be running.
    #[error("not running: {0}")]
    NotRunning(String),

    /// Destroy was attempted on a running zone.
    #[error("running: {0}")]
    Running(String),

    /// A name collided with an existing zone's name within a namespace.
    #[error("name already used: {0}")]
    NameAlreadyUsed(String),

    /// A `base`-produced dataset did not match the target identifier and
    /// could not be reconciled by renaming.
    #[error("illegal file system identifier: {0}")]
    IllegalFileSystemIdentifier(String),

    /// A subprocess (zfs, jail, mount, pkg, git, curl, ...) exited non-zero.
    #[error("external command failed: {argv:?}: {stderr}")]
    ExternalCommand { argv: Vec<String>, stderr: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Build an [`Error::ExternalCommand`] from a failed subprocess invocation.
    pub fn external_command(argv: &[impl AsRef<str>], stderr: impl Into<String>) -> Self {
        Error::ExternalCommand {
            argv: argv.iter().map(|a| a.as_ref().to_string()).collect(),
            stderr: stderr.into(),
        }
    }
}
