// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_a_simple_line() {
    let out = "zroot/zonys on /zroot/zonys (zfs, local, nfsv4acls)";
    let entries = parse_mount_output(out);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].source, "zroot/zonys");
    assert_eq!(entries[0].destination, PathBuf::from("/zroot/zonys"));
    assert_eq!(entries[0].flags, vec!["zfs", "local", "nfsv4acls"]);
}

#[test]
fn tolerates_whitespace_in_paths() {
    let out = "devfs on /zroot/zonys/zone/some id/dev (devfs)";
    let entries = parse_mount_output(out);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].destination, PathBuf::from("/zroot/zonys/zone/some id/dev"));
}

#[test]
fn skips_unparseable_lines() {
    let out = "garbage line with no shape\nzroot on /zroot (zfs, local)";
    let entries = parse_mount_output(out);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].source, "zroot");
}

#[test]
fn multiple_lines() {
    let out = "zroot on /zroot (zfs, local)\nzroot/zonys on /zroot/zonys (zfs, local)\ndevfs on /zroot/zonys/dev (devfs)";
    let entries = parse_mount_output(out);
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[2].flags, vec!["devfs"]);
}
