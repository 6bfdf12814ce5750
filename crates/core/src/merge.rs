// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Additive configuration merge.
//!
//! Mirrors the "additive" merge strategy used throughout the configuration
//! pipeline: maps are merged key-by-key (recursively), sequences are
//! concatenated, and scalars from `source` replace the value in `target`.
//! The merge law (see the workspace spec) requires that a zone's own local
//! spec wins over everything inherited from its lineage, so callers fold
//! ancestors oldest-first and apply each newer entry's values on top.

use crate::value::Value;
use serde_yaml::Mapping;

/// Merge `source` onto `target` in place, following additive semantics.
pub fn merge_additive(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Mapping(target_map), Value::Mapping(source_map)) => {
            merge_mapping(target_map, source_map);
        }
        (Value::Sequence(target_seq), Value::Sequence(source_seq)) => {
            target_seq.extend(source_seq);
        }
        (target, source) => {
            *target = source;
        }
    }
}

fn merge_mapping(target: &mut Mapping, source: Mapping) {
    for (key, source_value) in source {
        match target.get_mut(&key) {
            Some(existing) => merge_additive(existing, source_value),
            None => {
                target.insert(key, source_value);
            }
        }
    }
}

/// Fold a lineage of configuration entities into one merged value.
///
/// `entities` must be ordered newest-first (the zone's own local spec,
/// then its base, then its base's base, ...). The fold applies oldest-first
/// so that each newer entity's scalars and maps win over older ones, while
/// list values from every generation are preserved via concatenation.
pub fn fold_entities(entities: &[Value]) -> Value {
    let mut result = crate::value::empty_mapping();
    for entity in entities.iter().rev() {
        merge_additive(&mut result, entity.clone());
    }
    result
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
