// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `name`: records the zone's human-readable label in the persistence
//! sidecar. Uniqueness within a namespace is enforced by the zone store's
//! registry, not here.

use crate::context::ZoneContext;
use zonys_config::{CommitBinding, Handler, Phase, RollbackThunk};
use zonys_core::{Error, Result, Value};

pub struct NameHandler;

impl Handler<ZoneContext> for NameHandler {
    fn field(&self) -> &'static str {
        "name"
    }

    fn on_commit(
        &self,
        phase: Phase,
        binding: &CommitBinding,
        ctx: &mut ZoneContext,
        _normalized: &Value,
    ) -> Result<Option<RollbackThunk>> {
        if phase != Phase::BeforeCreateZone {
            return Ok(None);
        }
        let name = binding
            .options
            .as_str()
            .ok_or_else(|| Error::InvalidConfiguration("name: expected a string".into()))?;
        if let Some(persistence) = ctx.persistence.as_mut() {
            #[allow(clippy::expect_used)]
            persistence
                .data_mut()
                .as_mapping_mut()
                .expect("persistence sidecar root is a mapping")
                .insert(Value::from("name"), Value::from(name));
        }
        Ok(None)
    }
}

#[cfg(test)]
#[path = "name_tests.rs"]
mod tests;
