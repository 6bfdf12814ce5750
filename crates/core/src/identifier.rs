// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dataset and snapshot identifiers.
//!
//! A [`FileSystemIdentifier`] names a CoW-FS dataset as an ordered, non-empty
//! sequence of path segments. A [`SnapshotIdentifier`] pairs a dataset
//! identifier with a snapshot name. Both are immutable and render to the
//! canonical `a/b/c` (and `a/b/c@name`) forms.

use crate::error::{Error, Result};
use std::fmt;
use std::path::PathBuf;

pub const SEGMENT_SEPARATOR: char = '/';
pub const SNAPSHOT_SEPARATOR: char = '@';

/// An ordered, non-empty sequence of path segments naming a CoW-FS dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileSystemIdentifier {
    segments: Vec<String>,
}

impl FileSystemIdentifier {
    /// Build an identifier from individual segments.
    pub fn from_segments(segments: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(|s| s.is_empty()) {
            return Err(Error::InvalidIdentifier(
                "identifier must contain at least one non-empty segment".into(),
            ));
        }
        Ok(Self { segments })
    }

    /// Parse the canonical `a/b/c` form.
    pub fn parse(s: impl AsRef<str>) -> Result<Self> {
        let s = s.as_ref();
        if s.contains(SNAPSHOT_SEPARATOR) {
            return Err(Error::InvalidIdentifier(format!(
                "dataset identifier must not contain '{SNAPSHOT_SEPARATOR}': {s}"
            )));
        }
        Self::from_segments(s.split(SEGMENT_SEPARATOR))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn first(&self) -> &str {
        &self.segments[0]
    }

    #[allow(clippy::expect_used)]
    pub fn last(&self) -> &str {
        self.segments.last().expect("non-empty by construction")
    }

    /// The parent identifier, or `None` if this is a top-level dataset.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() <= 1 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Append one or more child segments.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// The absolute mountpoint path (`/a/b/c`) for this dataset, assuming the
    /// default mount layout.
    pub fn mountpoint(&self) -> PathBuf {
        let mut path = PathBuf::from("/");
        for segment in &self.segments {
            path.push(segment);
        }
        path
    }

    pub fn snapshot(&self, name: impl Into<String>) -> SnapshotIdentifier {
        SnapshotIdentifier {
            dataset: self.clone(),
            name: name.into(),
        }
    }
}

impl fmt::Display for FileSystemIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join(&SEGMENT_SEPARATOR.to_string()))
    }
}

impl std::str::FromStr for FileSystemIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A CoW-FS snapshot identifier: a dataset identifier plus a snapshot name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotIdentifier {
    dataset: FileSystemIdentifier,
    name: String,
}

impl SnapshotIdentifier {
    pub fn new(dataset: FileSystemIdentifier, name: impl Into<String>) -> Self {
        Self {
            dataset,
            name: name.into(),
        }
    }

    /// Parse the canonical `a/b/c@name` form.
    pub fn parse(s: impl AsRef<str>) -> Result<Self> {
        let s = s.as_ref();
        let (dataset, name) = s.split_once(SNAPSHOT_SEPARATOR).ok_or_else(|| {
            Error::InvalidIdentifier(format!("snapshot identifier must contain '@': {s}"))
        })?;
        if name.is_empty() {
            return Err(Error::InvalidIdentifier(format!(
                "snapshot name must not be empty: {s}"
            )));
        }
        Ok(Self {
            dataset: FileSystemIdentifier::parse(dataset)?,
            name: name.to_string(),
        })
    }

    pub fn dataset(&self) -> &FileSystemIdentifier {
        &self.dataset
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path to the snapshot's mounted contents (`<dataset>/.zfs/snapshot/<name>`).
    pub fn snapshot_path(&self) -> PathBuf {
        self.dataset.mountpoint().join(".zfs").join("snapshot").join(&self.name)
    }
}

impl fmt::Display for SnapshotIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.dataset, SNAPSHOT_SEPARATOR, self.name)
    }
}

impl std::str::FromStr for SnapshotIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[path = "identifier_tests.rs"]
mod tests;
