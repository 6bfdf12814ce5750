// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jail`: a free-form map of jail parameters (`allow.raw_sockets`,
//! `enforce_statfs`, `children.max`, ...), merged additively into
//! `ctx.jail_configuration` at `before_start_zone` alongside whatever the
//! `mount`/`network` handlers have already contributed there.

use crate::context::ZoneContext;
use zonys_config::{CommitBinding, Handler, Phase, RollbackThunk};
use zonys_core::{merge_additive, Error, Result, Value, ValueExt};

#[derive(Default)]
pub struct JailHandler;

impl JailHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Handler<ZoneContext> for JailHandler {
    fn field(&self) -> &'static str {
        "jail"
    }

    fn on_commit(
        &self,
        phase: Phase,
        binding: &CommitBinding,
        ctx: &mut ZoneContext,
        _normalized: &Value,
    ) -> Result<Option<RollbackThunk>> {
        if phase != Phase::BeforeStartZone {
            return Ok(None);
        }
        if !binding.options.is_mapping() {
            return Err(Error::InvalidConfiguration("jail: expected a map".into()));
        }
        merge_additive(&mut ctx.jail_configuration, binding.options.clone());
        Ok(None)
    }
}

#[cfg(test)]
#[path = "jail_tests.rs"]
mod tests;
