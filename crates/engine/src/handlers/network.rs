// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `network`: currently only the `host` mode — the zone inherits the
//! host's IP stack and gets a copy of its `/etc/resolv.conf`. The file is
//! copied in at `before_start_zone` and removed at `after_stop_zone`;
//! `ip4=inherit` is contributed to `ctx.jail_configuration` at the same
//! time the copy happens.

use crate::context::ZoneContext;
use std::path::{Path, PathBuf};
use zonys_config::{CommitBinding, Handler, Phase, RollbackThunk};
use zonys_core::{merge_additive, Error, Result, Value, ValueExt};

const RESOLV_CONF: &str = "etc/resolv.conf";

#[derive(Default)]
pub struct NetworkHandler;

impl NetworkHandler {
    pub fn new() -> Self {
        Self
    }

    fn resolv_conf_destination(&self, zone_root: &Path) -> PathBuf {
        zone_root.join(RESOLV_CONF)
    }

    fn run_before_start(&self, zone_root: &Path, ctx: &mut ZoneContext) -> Result<()> {
        let destination = self.resolv_conf_destination(zone_root);
        if destination.is_file() {
            std::fs::remove_file(&destination)?;
        }
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(Path::new("/").join(RESOLV_CONF), &destination)?;

        let mut overrides = zonys_core::value::empty_mapping();
        if let Value::Mapping(map) = &mut overrides {
            map.insert(Value::from("ip4"), Value::from("inherit"));
        }
        merge_additive(&mut ctx.jail_configuration, overrides);
        Ok(())
    }

    fn run_after_stop(&self, zone_root: &Path) -> Result<()> {
        let destination = self.resolv_conf_destination(zone_root);
        if destination.is_file() {
            std::fs::remove_file(&destination)?;
        }
        Ok(())
    }
}

impl Handler<ZoneContext> for NetworkHandler {
    fn field(&self) -> &'static str {
        "network"
    }

    fn on_commit(
        &self,
        phase: Phase,
        binding: &CommitBinding,
        ctx: &mut ZoneContext,
        _normalized: &Value,
    ) -> Result<Option<RollbackThunk>> {
        let mode = binding
            .options
            .as_str()
            .ok_or_else(|| Error::InvalidConfiguration("network: expected a string".into()))?;
        if mode != "host" {
            return Err(Error::InvalidConfiguration(format!(
                "network: unknown mode {mode}"
            )));
        }

        match phase {
            Phase::BeforeStartZone => {
                let zone_root = ctx
                    .file_system
                    .as_ref()
                    .ok_or_else(|| Error::InvalidConfiguration("network: no file system".into()))?
                    .path();
                self.run_before_start(&zone_root, ctx)?;
                Ok(None)
            }
            Phase::AfterStopZone => {
                let zone_root = ctx
                    .file_system
                    .as_ref()
                    .ok_or_else(|| Error::InvalidConfiguration("network: no file system".into()))?
                    .path();
                self.run_after_stop(&zone_root)?;
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "network_tests.rs"]
mod tests;
