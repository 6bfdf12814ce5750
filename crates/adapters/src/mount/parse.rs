// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A structured parser for `mount`'s listing output, tolerant of whitespace
//! inside paths (which a naive `split_whitespace` would mangle).
//!
//! Each line has the shape:
//!
//! ```text
//! <source> on <destination> (<flag>, <flag>, ...)
//! ```

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub source: String,
    pub destination: PathBuf,
    pub flags: Vec<String>,
}

/// Parse every line of `output`. Lines that don't match the expected shape
/// are skipped rather than aborting the whole parse — `mount`'s format is
/// not guaranteed stable across every fstype, and callers only care about
/// the entries relevant to their own destination.
pub fn parse_mount_output(output: &str) -> Vec<MountEntry> {
    output.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<MountEntry> {
    let (source, rest) = line.split_once(" on ")?;
    let (destination, flags) = rest.split_once(" (")?;
    let flags = flags.strip_suffix(')')?;
    Some(MountEntry {
        source: source.trim().to_string(),
        destination: PathBuf::from(destination.trim()),
        flags: flags.split(',').map(|f| f.trim().to_string()).collect(),
    })
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
