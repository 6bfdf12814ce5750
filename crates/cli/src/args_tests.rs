use super::*;
use zonys_core::ValueExt;

#[test]
fn bare_dash_sets_base_to_zero() {
    let spec = parse(&["-".to_string()]).unwrap();
    let map = spec.as_string_map();
    assert_eq!(map.get("base").unwrap().as_i64(), Some(0));
}

#[test]
fn key_value_pairs_strip_leading_dashes() {
    let args = vec!["--name".to_string(), "web".to_string()];
    let spec = parse(&args).unwrap();
    let map = spec.as_string_map();
    assert_eq!(map.get("name").unwrap().as_str(), Some("web"));
}

#[test]
fn scalar_values_are_typed() {
    let args = vec![
        "--temporary".to_string(),
        "true".to_string(),
        "--replicas".to_string(),
        "3".to_string(),
    ];
    let spec = parse(&args).unwrap();
    let map = spec.as_string_map();
    assert_eq!(map.get("temporary").unwrap().as_bool(), Some(true));
    assert_eq!(map.get("replicas").unwrap().as_i64(), Some(3));
}

#[test]
fn dangling_key_without_value_is_rejected() {
    assert!(parse(&["--name".to_string()]).is_err());
}

#[test]
fn multiple_pairs_all_land() {
    let args = vec![
        "--name".to_string(),
        "web".to_string(),
        "--base".to_string(),
        "template".to_string(),
    ];
    let spec = parse(&args).unwrap();
    let map = spec.as_string_map();
    assert_eq!(map.get("name").unwrap().as_str(), Some("web"));
    assert_eq!(map.get("base").unwrap().as_str(), Some("template"));
}
