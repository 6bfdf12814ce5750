// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The dynamic configuration value used by the configuration pipeline.
//!
//! Zone specs are free-form YAML, so we reuse [`serde_yaml::Value`] rather
//! than inventing a parallel `enum`. [`ValueExt`] adds the handful of
//! accessors the pipeline and handlers need.

use std::collections::HashMap;

/// A parsed YAML node. Alias kept so the rest of the crate doesn't leak
/// `serde_yaml` as a literal type name at every call site.
pub type Value = serde_yaml::Value;

pub trait ValueExt {
    fn as_string_map(&self) -> HashMap<String, Value>;
    fn is_mapping(&self) -> bool;
    fn is_sequence(&self) -> bool;
}

impl ValueExt for Value {
    /// Collect a top-level mapping's string keys into an owned map, dropping
    /// any non-string keys (zone specs never use them).
    fn as_string_map(&self) -> HashMap<String, Value> {
        let mut out = HashMap::new();
        if let Value::Mapping(map) = self {
            for (k, v) in map {
                if let Some(key) = k.as_str() {
                    out.insert(key.to_string(), v.clone());
                }
            }
        }
        out
    }

    fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }
}

/// Build an empty mapping value — the zero element for additive merge.
pub fn empty_mapping() -> Value {
    Value::Mapping(serde_yaml::Mapping::new())
}
