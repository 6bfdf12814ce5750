use super::*;
use crate::value::Value;

fn yaml(s: &str) -> Value {
    serde_yaml::from_str(s).unwrap()
}

#[test]
fn scalars_from_source_replace_target() {
    let mut target = yaml("name: old");
    merge_additive(&mut target, yaml("name: new"));
    assert_eq!(target, yaml("name: new"));
}

#[test]
fn maps_merge_key_by_key_recursively() {
    let mut target = yaml(
        r#"
        jail:
          hostname: old
          parameters:
            a: 1
        "#,
    );
    merge_additive(
        &mut target,
        yaml(
            r#"
            jail:
              parameters:
                b: 2
            "#,
        ),
    );
    assert_eq!(
        target,
        yaml(
            r#"
            jail:
              hostname: old
              parameters:
                a: 1
                b: 2
            "#
        )
    );
}

#[test]
fn sequences_concatenate() {
    let mut target = yaml("provision: [a, b]");
    merge_additive(&mut target, yaml("provision: [c]"));
    assert_eq!(target, yaml("provision: [a, b, c]"));
}

#[test]
fn fold_entities_lets_the_newest_entity_win_scalars() {
    // entities ordered newest-first, as a zone's lineage is collected.
    let local = yaml("name: child\nhostname: child.local");
    let base = yaml("name: parent\nhostname: parent.local\nprovision: [setup-base]");
    let merged = fold_entities(&[local, base]);
    assert_eq!(
        merged,
        yaml("name: child\nhostname: child.local\nprovision: [setup-base]")
    );
}

#[test]
fn fold_entities_concatenates_lists_across_the_whole_lineage() {
    let local = yaml("provision: [setup-child]");
    let base = yaml("provision: [setup-base]");
    let grandparent = yaml("provision: [setup-root]");
    let merged = fold_entities(&[local, base, grandparent]);
    assert_eq!(
        merged,
        yaml("provision: [setup-root, setup-base, setup-child]")
    );
}

#[test]
fn fold_entities_of_empty_lineage_is_empty_mapping() {
    assert_eq!(fold_entities(&[]), crate::value::empty_mapping());
}
