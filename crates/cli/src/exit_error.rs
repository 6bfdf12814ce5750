// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process exit code mapping.
//!
//! Commands return `zonys_core::Result<()>`; `main()` maps a final `Err`
//! into an `ExitError` exactly once, so it stays the sole call site of
//! `std::process::exit`.

use std::fmt;
use zonys_core::Error;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

/// User errors (bad input, missing/ambiguous zone, lifecycle guard
/// violations) exit 1; anything that reached an external command or the
/// filesystem/YAML layer exits 2, mirroring a subprocess's own nonzero
/// failure rather than a usage mistake.
impl From<Error> for ExitError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidConfiguration(_)
            | Error::InvalidIdentifier(_)
            | Error::AlreadyExists(_)
            | Error::NotFound(_)
            | Error::AlreadyRunning(_)
            | Error::NotRunning(_)
            | Error::Running(_)
            | Error::NameAlreadyUsed(_)
            | Error::IllegalFileSystemIdentifier(_) => 1,
            Error::ExternalCommand { .. } | Error::Io(_) | Error::Yaml(_) => 2,
        };
        ExitError::new(code, err.to_string())
    }
}
