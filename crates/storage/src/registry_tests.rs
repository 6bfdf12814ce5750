use super::*;

#[test]
fn inserts_and_looks_up_by_either_key() {
    let mut reg: Registry<i32> = Registry::new();
    reg.insert("uuid-1".into(), Some("web".into()), 1).unwrap();
    assert_eq!(reg.get("uuid-1"), Some(&1));
    assert_eq!(reg.get("web"), Some(&1));
    assert_eq!(reg.get("missing"), None);
}

#[test]
fn rejects_primary_key_collision() {
    let mut reg: Registry<i32> = Registry::new();
    reg.insert("uuid-1".into(), None, 1).unwrap();
    assert!(matches!(
        reg.insert("uuid-1".into(), None, 2),
        Err(Error::AlreadyExists(_))
    ));
}

#[test]
fn rejects_secondary_key_collision() {
    let mut reg: Registry<i32> = Registry::new();
    reg.insert("uuid-1".into(), Some("web".into()), 1).unwrap();
    assert!(matches!(
        reg.insert("uuid-2".into(), Some("web".into()), 2),
        Err(Error::NameAlreadyUsed(_))
    ));
}

#[test]
fn entries_without_a_secondary_key_are_fine() {
    let mut reg: Registry<i32> = Registry::new();
    reg.insert("uuid-1".into(), None, 1).unwrap();
    assert_eq!(reg.get("uuid-1"), Some(&1));
}

#[test]
fn remove_clears_both_keys() {
    let mut reg: Registry<i32> = Registry::new();
    reg.insert("uuid-1".into(), Some("web".into()), 1).unwrap();
    assert_eq!(reg.remove("web"), Some(1));
    assert_eq!(reg.get("uuid-1"), None);
    assert_eq!(reg.get("web"), None);
}

#[test]
fn match_prefix_matches_either_key_without_duplicates() {
    let mut reg: Registry<i32> = Registry::new();
    reg.insert("abc123".into(), Some("abcdef".into()), 1).unwrap();
    reg.insert("xyz999".into(), None, 2).unwrap();
    let matches = reg.match_prefix("abc");
    assert_eq!(matches.len(), 1);
    assert_eq!(*matches[0], 1);
}

#[test]
fn match_one_succeeds_for_unambiguous_prefix() {
    let mut reg: Registry<i32> = Registry::new();
    reg.insert("abc123".into(), None, 1).unwrap();
    reg.insert("xyz999".into(), None, 2).unwrap();
    assert_eq!(*reg.match_one("abc").unwrap(), 1);
}

#[test]
fn match_one_fails_on_ambiguous_or_missing_prefix() {
    let mut reg: Registry<i32> = Registry::new();
    reg.insert("abc123".into(), None, 1).unwrap();
    reg.insert("abc456".into(), None, 2).unwrap();
    assert!(reg.match_one("abc").is_err());
    assert!(reg.match_one("zzz").is_err());
}
