use super::*;

#[test]
fn parses_a_multi_segment_dataset() {
    let id = FileSystemIdentifier::parse("zroot/zonys/web").unwrap();
    assert_eq!(id.segments(), &["zroot", "zonys", "web"]);
    assert_eq!(id.to_string(), "zroot/zonys/web");
}

#[test]
fn rejects_empty_segments() {
    assert!(FileSystemIdentifier::parse("zroot//web").is_err());
    assert!(FileSystemIdentifier::parse("").is_err());
    assert!(FileSystemIdentifier::parse("/zroot").is_err());
}

#[test]
fn rejects_snapshot_separator_in_dataset() {
    assert!(FileSystemIdentifier::parse("zroot/zonys@snap").is_err());
}

#[test]
fn parent_and_child_roundtrip() {
    let id = FileSystemIdentifier::parse("zroot/zonys/web").unwrap();
    let parent = id.parent().unwrap();
    assert_eq!(parent.to_string(), "zroot/zonys");
    assert_eq!(parent.child("web"), id);
    assert!(FileSystemIdentifier::parse("zroot").unwrap().parent().is_none());
}

#[test]
fn mountpoint_is_absolute() {
    let id = FileSystemIdentifier::parse("zroot/zonys/web").unwrap();
    assert_eq!(id.mountpoint(), std::path::PathBuf::from("/zroot/zonys/web"));
}

#[test]
fn snapshot_parses_and_renders() {
    let snap = SnapshotIdentifier::parse("zroot/zonys/web@base").unwrap();
    assert_eq!(snap.dataset().to_string(), "zroot/zonys/web");
    assert_eq!(snap.name(), "base");
    assert_eq!(snap.to_string(), "zroot/zonys/web@base");
}

#[test]
fn snapshot_rejects_missing_separator_or_empty_name() {
    assert!(SnapshotIdentifier::parse("zroot/zonys/web").is_err());
    assert!(SnapshotIdentifier::parse("zroot/zonys/web@").is_err());
}

#[test]
fn snapshot_path_points_under_dot_zfs() {
    let snap = SnapshotIdentifier::parse("zroot/zonys/web@base").unwrap();
    assert_eq!(
        snap.snapshot_path(),
        std::path::PathBuf::from("/zroot/zonys/web/.zfs/snapshot/base")
    );
}
