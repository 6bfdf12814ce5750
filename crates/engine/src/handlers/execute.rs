// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `execute`: maps lifecycle hooks to shell command lists, run via the
//! zone's jail (`afterCreate`/`beforeDestroy` instead run in a throwaway
//! [`zonys_adapters::jail::temporary`] jail, since the zone has no live jail
//! at those points). `rc: true` additionally runs `/bin/sh /etc/rc` at
//! start and `/etc/rc.shutdown` at stop.

use crate::context::ZoneContext;
use std::sync::Arc;
use zonys_adapters::command::CommandRunner;
use zonys_adapters::jail;
use zonys_config::{CommitBinding, Handler, Phase, RollbackThunk};
use zonys_core::{Error, Result, Value, ValueExt};

pub struct ExecuteHandler {
    runner: Arc<dyn CommandRunner>,
}

impl ExecuteHandler {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn commands(options: &Value, key: &str) -> Vec<String> {
        options
            .as_string_map()
            .get(key)
            .and_then(|v| v.as_sequence().cloned())
            .unwrap_or_default()
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    fn rc(options: &Value) -> bool {
        options
            .as_string_map()
            .get("rc")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    fn run_in_jail(ctx: &ZoneContext, command: &str) -> Result<()> {
        ctx.jail
            .as_ref()
            .ok_or_else(|| Error::InvalidConfiguration("execute: no jail in context".into()))?
            .execute(&["/bin/sh", "-c", command])?;
        Ok(())
    }

    fn run_temporary(&self, zone_name: &str, zone_root: &std::path::Path, commands: &[String]) -> Result<()> {
        if commands.is_empty() {
            return Ok(());
        }
        let runner = self.runner.clone();
        jail::temporary(zone_name, zone_root, &[], runner, |handle| {
            for command in commands {
                handle.execute(&["/bin/sh", "-c", command])?;
            }
            Ok(())
        })
    }
}

impl Handler<ZoneContext> for ExecuteHandler {
    fn field(&self) -> &'static str {
        "execute"
    }

    fn on_commit(
        &self,
        phase: Phase,
        binding: &CommitBinding,
        ctx: &mut ZoneContext,
        _normalized: &Value,
    ) -> Result<Option<RollbackThunk>> {
        match phase {
            Phase::AfterCreateZone => {
                let commands = Self::commands(binding.options, "afterCreate");
                if commands.is_empty() {
                    return Ok(None);
                }
                let zone_root = ctx
                    .file_system
                    .as_ref()
                    .ok_or_else(|| Error::InvalidConfiguration("execute: no file system".into()))?
                    .path();
                let zone_name = ctx
                    .file_system_identifier
                    .as_ref()
                    .map(|id| id.last().to_string())
                    .ok_or_else(|| Error::InvalidConfiguration("execute: no zone identifier".into()))?;
                self.run_temporary(&zone_name, &zone_root, &commands)?;
                Ok(None)
            }
            Phase::AfterStartZone => {
                for command in Self::commands(binding.options, "beforeStart") {
                    Self::run_in_jail(ctx, &command)?;
                }
                if Self::rc(binding.options) {
                    Self::run_in_jail(ctx, "/bin/sh /etc/rc")?;
                }
                for command in Self::commands(binding.options, "start") {
                    Self::run_in_jail(ctx, &command)?;
                }
                for command in Self::commands(binding.options, "afterStart") {
                    Self::run_in_jail(ctx, &command)?;
                }
                Ok(None)
            }
            Phase::BeforeStopZone => {
                for command in Self::commands(binding.options, "beforeStop") {
                    Self::run_in_jail(ctx, &command)?;
                }
                for command in Self::commands(binding.options, "stop") {
                    Self::run_in_jail(ctx, &command)?;
                }
                if Self::rc(binding.options) {
                    Self::run_in_jail(ctx, "/bin/sh /etc/rc.shutdown")?;
                }
                for command in Self::commands(binding.options, "afterStop") {
                    Self::run_in_jail(ctx, &command)?;
                }
                Ok(None)
            }
            Phase::BeforeDestroyZone => {
                let commands = Self::commands(binding.options, "beforeDestroy");
                if commands.is_empty() {
                    return Ok(None);
                }
                let file_system = ctx
                    .file_system
                    .as_ref()
                    .ok_or_else(|| Error::InvalidConfiguration("execute: no file system".into()))?;
                let zone_root = file_system.path();
                let zone_name = file_system.identifier().last().to_string();
                self.run_temporary(&zone_name, &zone_root, &commands)?;
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "execute_tests.rs"]
mod tests;
