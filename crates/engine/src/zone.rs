// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`Zone`]: a handle to an existing zone — its dataset, its persistence
//! sidecar, and the lifecycle operations (`start`/`stop`/`destroy`/...)
//! that drive it through a fresh [`Manager`] built for each operation.
//!
//! A zone never holds a long-lived `Manager`: every operation reads the
//! spec relevant to it (local for creation, merged for everything else)
//! into a throwaway manager, commits the phases that operation needs, and
//! discards it. This mirrors the workspace spec's "per-zone usage
//! patterns" (§4.7) directly — there is no persistent transaction state
//! between calls.

use crate::context::ZoneContext;
use crate::handlers;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;
use zonys_adapters::command::CommandRunner;
use zonys_adapters::cow_fs::{FileSystem, Snapshot};
use zonys_adapters::jail::{JailIdentifier, JailParam};
use zonys_config::{Manager, Phase};
use zonys_core::{fold_entities, Error, FileSystemIdentifier, Result, Value, ValueExt};
use zonys_storage::Sidecar;

/// Run `body`, rolling `manager` back (and surfacing the rollback's own
/// error, if any, in place of the original) when it fails.
fn with_rollback<Ctx, T>(manager: &mut Manager<Ctx>, body: impl FnOnce() -> Result<T>) -> Result<T> {
    match body() {
        Ok(value) => Ok(value),
        Err(err) => {
            manager.rollback()?;
            Err(err)
        }
    }
}

fn sidecar_path(zone_root: &FileSystemIdentifier, uuid: &str) -> PathBuf {
    zone_root.mountpoint().join(format!("{uuid}.yaml"))
}

/// Flatten a jail-configuration mapping (as accumulated by the `mount`/
/// `network`/`jail` handlers in `ctx.jail_configuration`) into the
/// owned key/value pairs [`zonys_adapters::jail::JailIdentifier::create`]
/// expects.
fn jail_params(value: &Value) -> Vec<(String, JailParam)> {
    let mut out = Vec::new();
    if let Value::Mapping(map) = value {
        for (key, value) in map {
            let Some(key) = key.as_str() else { continue };
            let param = match value {
                Value::Bool(b) => JailParam::Bool(*b),
                Value::Null => JailParam::Flag,
                Value::String(s) => JailParam::String(s.clone()),
                Value::Number(n) => JailParam::String(n.to_string()),
                _ => continue,
            };
            out.push((key.to_string(), param));
        }
    }
    out
}

/// A handle to a zone. Cheap to clone — every field is either an `Arc`, an
/// identifier, or the in-memory sidecar mapping — so [`crate::store::ZoneStore`]
/// keeps clones in its index rather than references, avoiding borrow
/// conflicts between lookup and the `&mut self` operations that follow it.
#[derive(Clone)]
pub struct Zone {
    runner: Arc<dyn CommandRunner>,
    zone_root: FileSystemIdentifier,
    identifier: FileSystemIdentifier,
    persistence: Sidecar,
}

impl Zone {
    /// Open a handle to an already-created zone. `zone_root` is the zone
    /// store's dataset identifier; `uuid` is this zone's dataset's last
    /// segment.
    pub fn open(runner: Arc<dyn CommandRunner>, zone_root: FileSystemIdentifier, uuid: &str) -> Result<Self> {
        let identifier = zone_root.child(uuid);
        if !FileSystem::exists(&runner, &identifier) {
            return Err(Error::NotFound(identifier.to_string()));
        }
        let persistence = Sidecar::open(sidecar_path(&zone_root, uuid))?;
        Ok(Self {
            runner,
            zone_root,
            identifier,
            persistence,
        })
    }

    pub(crate) fn from_parts(
        runner: Arc<dyn CommandRunner>,
        zone_root: FileSystemIdentifier,
        identifier: FileSystemIdentifier,
        persistence: Sidecar,
    ) -> Self {
        Self {
            runner,
            zone_root,
            identifier,
            persistence,
        }
    }

    pub fn identifier(&self) -> &FileSystemIdentifier {
        &self.identifier
    }

    pub fn uuid(&self) -> &str {
        self.identifier.last()
    }

    pub fn name(&self) -> Option<String> {
        self.persistence
            .data()
            .as_string_map()
            .get("name")
            .and_then(|v| v.as_str().map(str::to_string))
    }

    /// The zone's identifier for display: its name if set, else its UUID —
    /// mirroring the source's `identifier` property.
    pub fn display_identifier(&self) -> String {
        self.name().unwrap_or_else(|| self.uuid().to_string())
    }

    pub fn base_uuid(&self) -> Option<String> {
        self.persistence
            .data()
            .as_string_map()
            .get("base")
            .and_then(|v| v.as_str().map(str::to_string))
    }

    pub fn path(&self) -> PathBuf {
        self.identifier.mountpoint()
    }

    pub fn file_system(&self) -> Result<FileSystem> {
        FileSystem::open(self.runner.clone(), self.identifier.clone())
    }

    pub fn local_spec(&self) -> Value {
        self.persistence
            .data()
            .as_string_map()
            .get("local")
            .cloned()
            .unwrap_or_else(zonys_core::value::empty_mapping)
    }

    pub fn parent(&self) -> Result<Option<Zone>> {
        match self.base_uuid() {
            Some(uuid) => Ok(Some(Zone::open(self.runner.clone(), self.zone_root.clone(), &uuid)?)),
            None => Ok(None),
        }
    }

    /// This zone's local spec followed by its lineage's, newest first — the
    /// input [`fold_entities`] expects.
    pub fn entities(&self) -> Result<Vec<Value>> {
        let mut entities = vec![self.local_spec()];
        if let Some(parent) = self.parent()? {
            entities.extend(parent.entities()?);
        }
        Ok(entities)
    }

    pub fn merged_configuration(&self) -> Result<Value> {
        Ok(fold_entities(&self.entities()?))
    }

    pub fn auto_start(&self) -> Result<bool> {
        Ok(self
            .merged_configuration()?
            .as_string_map()
            .get("autostart")
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    pub fn snapshot_names(&self) -> Result<Vec<String>> {
        Ok(self
            .file_system()?
            .snapshots()
            .iter()?
            .into_iter()
            .map(|s| s.identifier().name().to_string())
            .collect())
    }

    pub fn is_running(&self) -> Result<bool> {
        JailIdentifier::new(self.uuid(), self.runner.clone()).exists()
    }

    fn runtime_manager(&self) -> Result<(Manager<ZoneContext>, Value)> {
        let mut spec = self.merged_configuration()?;
        let mut manager = Manager::new(handlers::runtime_handlers(self.runner.clone()));
        manager.read(&mut spec, &self.path())?;
        Ok((manager, spec))
    }

    pub fn start(&self) -> Result<()> {
        if self.is_running()? {
            return Err(Error::AlreadyRunning(self.uuid().to_string()));
        }
        let (mut manager, _spec) = self.runtime_manager()?;
        let mut ctx = ZoneContext::new(self.runner.clone());

        let result = with_rollback(&mut manager, || {
            manager.commit(Phase::BeforeStartZone, &mut ctx)?;
            let owned = jail_params(&ctx.jail_configuration);
            let params: Vec<(&str, JailParam)> = owned.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
            let jail = JailIdentifier::new(self.uuid(), self.runner.clone()).create(&self.path(), &params)?;
            ctx.jail = Some(jail);
            manager.commit(Phase::AfterStartZone, &mut ctx)
        });

        if result.is_err() {
            if let Some(jail) = ctx.jail.take() {
                let _ = jail.destroy();
            }
        }
        result
    }

    pub fn stop(&self) -> Result<()> {
        if !self.is_running()? {
            return Err(Error::NotRunning(self.uuid().to_string()));
        }
        let (mut manager, _spec) = self.runtime_manager()?;
        let mut ctx = ZoneContext::new(self.runner.clone());
        ctx.jail = Some(JailIdentifier::new(self.uuid(), self.runner.clone()).open()?);

        with_rollback(&mut manager, || {
            manager.commit(Phase::BeforeStopZone, &mut ctx)?;
            #[allow(clippy::expect_used)]
            ctx.jail
                .take()
                .expect("set before before_stop_zone commits")
                .destroy()?;
            manager.commit(Phase::AfterStopZone, &mut ctx)
        })?;

        if ctx.destroy_requested {
            self.destroy()?;
        }
        Ok(())
    }

    pub fn destroy(&self) -> Result<()> {
        if self.is_running()? {
            return Err(Error::Running(self.uuid().to_string()));
        }
        let (mut manager, _spec) = self.runtime_manager()?;
        let mut ctx = ZoneContext::new(self.runner.clone());

        with_rollback(&mut manager, || {
            manager.commit(Phase::BeforeDestroyZone, &mut ctx)?;
            self.file_system()?.destroy()?;
            self.persistence.destroy()?;
            manager.commit(Phase::AfterDestroyZone, &mut ctx)
        })
    }

    pub fn restart(&self) -> Result<()> {
        self.stop()?;
        self.start()
    }

    pub fn up(&self) -> Result<()> {
        if self.is_running()? {
            Ok(())
        } else {
            self.start()
        }
    }

    pub fn down(&self) -> Result<()> {
        if self.is_running()? {
            self.stop()
        } else {
            Ok(())
        }
    }

    pub fn reup(&self) -> Result<()> {
        self.down()?;
        self.up()
    }

    pub fn undeploy(&self) -> Result<()> {
        self.down()?;
        self.destroy()
    }

    /// Take a named snapshot, embedding the merged spec as `.zonys.yaml` in
    /// the dataset root for the duration of the `zfs snapshot` call (the
    /// file is always removed from the live dataset afterward, success or
    /// failure — only the snapshot keeps a copy).
    pub fn create_snapshot(&self, name: &str) -> Result<Snapshot> {
        let (mut manager, merged) = self.runtime_manager()?;
        let mut ctx = ZoneContext::new(self.runner.clone());
        ctx.snapshot_name = Some(name.to_string());

        with_rollback(&mut manager, || {
            manager.commit(Phase::BeforeCreateSnapshot, &mut ctx)?;

            let file_system = self.file_system()?;
            let sidecar_in_dataset = file_system.path().join(".zonys.yaml");
            if sidecar_in_dataset.is_file() {
                std::fs::remove_file(&sidecar_in_dataset)?;
            }
            std::fs::write(&sidecar_in_dataset, serde_yaml::to_string(&merged)?)?;
            let created = file_system.snapshots().create(name);
            let _ = std::fs::remove_file(&sidecar_in_dataset);
            let snapshot = created?;

            ctx.snapshot = Some(snapshot.clone());
            manager.commit(Phase::AfterCreateSnapshot, &mut ctx)?;
            Ok(snapshot)
        })
    }

    /// Destroy a named snapshot, running it through the same
    /// before/after-commit phases as every other lifecycle step rather
    /// than calling `Snapshot::destroy` directly.
    pub fn destroy_snapshot(&self, name: &str) -> Result<()> {
        let (mut manager, _merged) = self.runtime_manager()?;
        let mut ctx = ZoneContext::new(self.runner.clone());
        ctx.snapshot_name = Some(name.to_string());
        ctx.snapshot = Some(self.file_system()?.snapshots().open(name)?);

        with_rollback(&mut manager, || {
            manager.commit(Phase::BeforeDestroySnapshot, &mut ctx)?;
            #[allow(clippy::expect_used)]
            ctx.snapshot
                .take()
                .expect("set before before_destroy_snapshot commits")
                .destroy()?;
            manager.commit(Phase::AfterDestroySnapshot, &mut ctx)
        })
    }

    /// Stream a throwaway snapshot of the zone to `sink`, destroying the
    /// snapshot once the send completes (or fails) — the snapshot never
    /// outlives the call.
    pub fn send(&self, sink: &mut dyn Write, compress: bool) -> Result<()> {
        let name = format!("send-{}", Uuid::new_v4());
        let snapshot = self.create_snapshot(&name)?;
        let send_result = snapshot.send(sink, compress);
        let destroy_result = self.destroy_snapshot(&name);
        send_result?;
        destroy_result
    }

    /// Run `command` inside the zone's jail via `jexec -l`, with caller-
    /// supplied stdio — the one place this crate reaches for
    /// `std::process::Command` directly rather than [`CommandRunner`],
    /// since an interactive console needs the real terminal wired through,
    /// not `CommandRunner`'s always-captured output.
    pub fn execute_io(
        &self,
        command: &[&str],
        stdin: std::process::Stdio,
        stdout: std::process::Stdio,
        stderr: std::process::Stdio,
    ) -> Result<std::process::ExitStatus> {
        if !self.is_running()? {
            return Err(Error::NotRunning(self.uuid().to_string()));
        }
        let mut argv = vec!["jexec".to_string(), "-l".to_string(), self.uuid().to_string()];
        argv.extend(command.iter().map(|s| s.to_string()));
        let status = std::process::Command::new(&argv[0])
            .args(&argv[1..])
            .stdin(stdin)
            .stdout(stdout)
            .stderr(stderr)
            .status()?;
        Ok(status)
    }

    pub fn console(&self) -> Result<std::process::ExitStatus> {
        use std::process::Stdio;
        self.execute_io(&["/bin/sh"], Stdio::inherit(), Stdio::inherit(), Stdio::inherit())
    }
}

#[cfg(test)]
#[path = "zone_tests.rs"]
mod tests;
