// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `temporary`: a boolean that, when true, requests destruction of the zone
//! right after it stops. The actual destroy happens in the caller (the
//! zone store), which checks [`ZoneContext::destroy_requested`] after
//! `stop()`'s commit returns.

use crate::context::ZoneContext;
use zonys_config::{CommitBinding, Handler, Phase, RollbackThunk};
use zonys_core::{Result, Value};

#[derive(Default)]
pub struct TemporaryHandler;

impl TemporaryHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Handler<ZoneContext> for TemporaryHandler {
    fn field(&self) -> &'static str {
        "temporary"
    }

    fn on_commit(
        &self,
        phase: Phase,
        binding: &CommitBinding,
        ctx: &mut ZoneContext,
        _normalized: &Value,
    ) -> Result<Option<RollbackThunk>> {
        if phase != Phase::AfterStopZone {
            return Ok(None);
        }
        if binding.options.as_bool().unwrap_or(false) {
            ctx.destroy_requested = true;
        }
        Ok(None)
    }
}

#[cfg(test)]
#[path = "temporary_tests.rs"]
mod tests;
