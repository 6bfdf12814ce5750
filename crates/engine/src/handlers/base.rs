// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `base`: either a readable send-stream (an integer in the spec) or a
//! string naming a parent zone (by name/UUID) or a plain YAML spec file.
//!
//! The integer case is the CLI's `zone create -`: every workspace crate
//! forbids `unsafe_code`, so there is no way to reconstruct an arbitrary OS
//! file descriptor from the number carried in the options value. Any
//! integer here is therefore read as "take the send-stream from this
//! process's stdin" — the only path that ever produces one in practice.

use crate::context::ZoneContext;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;
use zonys_adapters::command::CommandRunner;
use zonys_adapters::cow_fs::FileSystem;
use zonys_config::{CommitBinding, ConfigEvent, Handler, Phase, RollbackThunk};
use zonys_core::{merge_additive, Error, FileSystemIdentifier, Result, Value, ValueExt};
use zonys_storage::Sidecar;

pub struct BaseHandler {
    runner: Arc<dyn CommandRunner>,
    zone_root: FileSystemIdentifier,
}

impl BaseHandler {
    pub fn new(runner: Arc<dyn CommandRunner>, zone_root: FileSystemIdentifier) -> Self {
        Self { runner, zone_root }
    }

    fn sidecar_path(&self, uuid: &str) -> PathBuf {
        self.zone_root.mountpoint().join(format!("{uuid}.yaml"))
    }

    /// Scan the zone store's sidecars for one matching `query` by UUID or
    /// recorded `name`.
    fn find_zone(&self, query: &str) -> Result<FileSystemIdentifier> {
        for child in FileSystem::open(self.runner.clone(), self.zone_root.clone())?
            .children()
            .iter()?
        {
            let uuid = child.identifier().last().to_string();
            let sidecar = Sidecar::open(self.sidecar_path(&uuid))?;
            let name = sidecar
                .data()
                .as_string_map()
                .get("name")
                .and_then(|v| v.as_str().map(str::to_string));
            if uuid == query || name.as_deref() == Some(query) {
                return Ok(child.identifier().clone());
            }
        }
        Err(Error::NotFound(format!("base zone {query}")))
    }
}

impl Handler<ZoneContext> for BaseHandler {
    fn field(&self) -> &'static str {
        "base"
    }

    /// The plain-YAML-file case is handled like `include`: no lineage, just
    /// an additive merge of the referenced spec into the enclosing
    /// configuration.
    fn before_configuration(&self, event: &mut ConfigEvent<ZoneContext>) -> Result<()> {
        let Some(relative) = event.options.as_str() else {
            return Ok(());
        };
        let candidate = if PathBuf::from(relative).is_absolute() {
            PathBuf::from(relative)
        } else {
            event.base.join(relative)
        };
        if !candidate.is_file() {
            return Ok(());
        }
        let contents = std::fs::read_to_string(&candidate)?;
        let mut loaded: Value = serde_yaml::from_str(&contents)?;
        let new_base = candidate
            .parent()
            .map(std::path::Path::to_path_buf)
            .unwrap_or_else(|| event.base.clone());
        event.manager.read(&mut loaded, &new_base)?;
        merge_additive(event.configuration, loaded);
        Ok(())
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
        let target = ctx
            .file_system_identifier
            .clone()
            .ok_or_else(|| Error::InvalidConfiguration("base: no target identifier set".into()))?;

        if let Some(_fd) = binding.options.as_i64() {
            let temp = self.zone_root.child(format!("recv-{}", Uuid::new_v4()));
            let snapshot = FileSystem::receive(
                self.runner.clone(),
                temp.clone(),
                &mut std::io::stdin(),
            )?;
            let received = snapshot.file_system()?;

            let inherited_path = received.path().join(".zonys.yaml");
            if inherited_path.is_file() {
                let contents = std::fs::read_to_string(&inherited_path)?;
                let inherited: Value = serde_yaml::from_str(&contents)?;
                if let Some(persistence) = ctx.persistence.as_mut() {
                    merge_additive(persistence.data_mut(), inherited);
                }
            }

            let final_fs = received.rename(target)?;
            ctx.file_system = Some(final_fs);
            return Ok(None);
        }

        let query = binding
            .options
            .as_str()
            .ok_or_else(|| Error::InvalidConfiguration("base: expected a string or integer".into()))?;
        let parent_identifier = self.find_zone(query)?;
        let parent_uuid = parent_identifier.last().to_string();

        let parent_fs = FileSystem::open(self.runner.clone(), parent_identifier)?;
        let initial = parent_fs.snapshots().open("initial")?;
        let cloned = initial.clone_to(target)?;
        ctx.file_system = Some(cloned);

        if let Some(persistence) = ctx.persistence.as_mut() {
            #[allow(clippy::expect_used)]
            persistence
                .data_mut()
                .as_mapping_mut()
                .expect("persistence sidecar root is a mapping")
                .insert(Value::from("base"), Value::from(parent_uuid));
        }
        Ok(None)
    }
}

#[cfg(test)]
#[path = "base_tests.rs"]
mod tests;
