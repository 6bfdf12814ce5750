// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A dual-keyed in-memory collection: every entry has a mandatory primary
//! key (a zone's UUID string) and an optional secondary key (its name),
//! unique within the registry when present. Lookup accepts either key, or
//! an unambiguous prefix of either.

use std::collections::HashMap;
use zonys_core::{Error, Result};

#[derive(Debug, Default)]
pub struct Registry<V> {
    primary: HashMap<String, V>,
    secondary_to_primary: HashMap<String, String>,
}

impl<V> Registry<V> {
    pub fn new() -> Self {
        Self {
            primary: HashMap::new(),
            secondary_to_primary: HashMap::new(),
        }
    }

    /// Insert a new entry. Fails if either key is already in use.
    pub fn insert(&mut self, primary_key: String, secondary_key: Option<String>, value: V) -> Result<()> {
        if self.primary.contains_key(&primary_key) {
            return Err(Error::AlreadyExists(primary_key));
        }
        if let Some(secondary) = &secondary_key {
            if self.secondary_to_primary.contains_key(secondary) {
                return Err(Error::NameAlreadyUsed(secondary.clone()));
            }
        }
        if let Some(secondary) = secondary_key {
            self.secondary_to_primary.insert(secondary, primary_key.clone());
        }
        self.primary.insert(primary_key, value);
        Ok(())
    }

    /// Remove whichever entry is known by `key` (primary or secondary, exact match).
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let primary_key = self.resolve_primary_key(key)?;
        self.secondary_to_primary.retain(|_, v| v != &primary_key);
        self.primary.remove(&primary_key)
    }

    /// Exact lookup by primary or secondary key.
    pub fn get(&self, key: &str) -> Option<&V> {
        let primary_key = self.resolve_primary_key(key)?;
        self.primary.get(&primary_key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn resolve_primary_key(&self, key: &str) -> Option<String> {
        if self.primary.contains_key(key) {
            return Some(key.to_string());
        }
        self.secondary_to_primary.get(key).cloned()
    }

    /// All entries whose primary or secondary key starts with `query`.
    pub fn match_prefix(&self, query: &str) -> Vec<&V> {
        let mut primary_keys: Vec<&String> = self
            .primary
            .keys()
            .filter(|k| k.starts_with(query))
            .collect();
        for (secondary, primary) in &self.secondary_to_primary {
            if secondary.starts_with(query) && !primary_keys.contains(&primary) {
                primary_keys.push(primary);
            }
        }
        primary_keys
            .into_iter()
            .filter_map(|k| self.primary.get(k))
            .collect()
    }

    /// The unique prefix match, or an error if zero or more than one entry matches.
    pub fn match_one(&self, query: &str) -> Result<&V> {
        let mut matches = self.match_prefix(query);
        match matches.len() {
            0 => Err(Error::NotFound(query.to_string())),
            1 => Ok(matches.remove(0)),
            _ => Err(Error::AlreadyExists(format!(
                "ambiguous prefix {query}: matches {} entries",
                matches.len()
            ))),
        }
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.primary.values()
    }

    pub fn len(&self) -> usize {
        self.primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
