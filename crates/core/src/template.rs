// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `{path}` template interpolation used by the lifecycle transaction manager
//! when it formats handler options before each commit phase.
//!
//! Three namespaces are available inside a template:
//!
//! - `{env.KEY}` / `{environment.KEY}` — the process environment
//! - `{name}` / `{name.sub.path}` — the manager's variable table, navigated
//!   dot-segment by dot-segment
//!
//! Navigation never raises: an absent key at any point in a dotted path
//! resolves to the empty string rather than failing the whole template, per
//! [`Navigator`].

use crate::value::Value;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z0-9_-]+)*)\}")
        .expect("constant regex pattern is valid")
});

/// A read-only view into a [`Value`] that answers dotted attribute access
/// with either a sub-navigator or the empty-string sentinel, so `{foo.bar}`
/// never raises even when `foo` is absent or not a mapping.
pub struct Navigator<'a> {
    value: Option<&'a Value>,
}

impl<'a> Navigator<'a> {
    pub fn new(value: Option<&'a Value>) -> Self {
        Self { value }
    }

    /// Descend one dotted segment.
    pub fn get(&self, segment: &str) -> Navigator<'_> {
        let next = self.value.and_then(|v| match v {
            Value::Mapping(map) => map.get(segment),
            _ => None,
        });
        Navigator { value: next }
    }

    /// Render the current position as a template-substitutable string.
    ///
    /// Scalars render via their natural `Display`; mappings and sequences
    /// that reach this point (a template referenced a container directly)
    /// render as empty, matching the nil-sentinel behavior for anything
    /// that isn't a leaf value.
    pub fn render(&self) -> String {
        match self.value {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Null) | None => String::new(),
            Some(Value::Mapping(_)) | Some(Value::Sequence(_)) | Some(Value::Tagged(_)) => {
                String::new()
            }
        }
    }
}

/// Resolve a dotted path against the variable table, falling back to the
/// process environment for `env.*` / `environment.*` paths.
fn resolve(path: &str, vars: &HashMap<String, Value>) -> String {
    let mut segments = path.split('.');
    let head = segments.next().unwrap_or_default();

    if head == "env" || head == "environment" {
        let key = segments.collect::<Vec<_>>().join(".");
        return std::env::var(&key).unwrap_or_default();
    }

    let mut nav = Navigator::new(vars.get(head));
    for segment in segments {
        nav = nav.get(segment);
    }
    nav.render()
}

/// Interpolate every `{path}` placeholder in `template`.
///
/// Placeholders that don't match the `{identifier(.identifier)*}` shape are
/// left untouched, matching the source format operation's behavior of
/// ignoring anything it doesn't recognize as a field reference.
pub fn interpolate(template: &str, vars: &HashMap<String, Value>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures| resolve(&caps[1], vars))
        .to_string()
}

/// Recursively interpolate every string found inside a [`Value`] tree
/// (through mappings and sequences), leaving non-string scalars untouched.
pub fn interpolate_value(value: &Value, vars: &HashMap<String, Value>) -> Value {
    match value {
        Value::String(s) => Value::String(interpolate(s, vars)),
        Value::Sequence(seq) => {
            Value::Sequence(seq.iter().map(|v| interpolate_value(v, vars)).collect())
        }
        Value::Mapping(map) => {
            let mut out = serde_yaml::Mapping::new();
            for (k, v) in map {
                out.insert(k.clone(), interpolate_value(v, vars));
            }
            Value::Mapping(out)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
