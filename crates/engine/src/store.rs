// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`ZoneStore`]: the namespace's `zone` dataset, its children indexed by
//! UUID and (when set) name, and the constructors/lifecycle verbs that
//! operate on them.
//!
//! Lookup and collision enforcement are delegated to
//! [`zonys_storage::Registry`]; this module additionally tracks discovery/
//! creation order in an [`indexmap::IndexSet`] so `list()` — and therefore
//! `zone status` — iterates zones in a stable order instead of whatever
//! order a `HashMap` happens to produce.

use crate::context::ZoneContext;
use crate::handlers;
use crate::zone::Zone;
use indexmap::IndexSet;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;
use zonys_adapters::command::CommandRunner;
use zonys_adapters::cow_fs::FileSystem;
use zonys_config::{Manager, Phase};
use zonys_core::{Error, FileSystemIdentifier, Result, Value, ValueExt};
use zonys_storage::{Registry, Sidecar};

fn sidecar_path(zone_root: &FileSystemIdentifier, uuid: &str) -> PathBuf {
    zone_root.mountpoint().join(format!("{uuid}.yaml"))
}

pub struct ZoneStore {
    runner: Arc<dyn CommandRunner>,
    file_system: FileSystem,
    registry: Registry<Zone>,
    order: IndexSet<String>,
}

impl ZoneStore {
    /// Open the namespace's `zone` dataset (creating and mounting it if
    /// necessary) and index its existing children.
    pub fn open(runner: Arc<dyn CommandRunner>, namespace_file_system: &FileSystem) -> Result<Self> {
        let children = namespace_file_system.children();
        let file_system = if children.contains("zone") {
            children.open("zone")?
        } else {
            children.create("zone")?
        };
        if !file_system.is_mounted() {
            file_system.mount()?;
        }

        let mut registry = Registry::new();
        let mut order = IndexSet::new();
        let zone_root = file_system.identifier().clone();
        for child in file_system.children().iter()? {
            let uuid = child.identifier().last().to_string();
            let zone = Zone::open(runner.clone(), zone_root.clone(), &uuid)?;
            registry.insert(uuid.clone(), zone.name(), zone)?;
            order.insert(uuid);
        }

        Ok(Self {
            runner,
            file_system,
            registry,
            order,
        })
    }

    pub fn zone_root(&self) -> &FileSystemIdentifier {
        self.file_system.identifier()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Zones in discovery/creation order.
    pub fn list(&self) -> Vec<&Zone> {
        self.order.iter().filter_map(|key| self.registry.get(key)).collect()
    }

    pub fn get(&self, key: &str) -> Option<&Zone> {
        self.registry.get(key)
    }

    pub fn match_prefix(&self, query: &str) -> Vec<&Zone> {
        self.registry.match_prefix(query)
    }

    pub fn match_one(&self, query: &str) -> Result<&Zone> {
        self.registry.match_one(query)
    }

    fn resolve(&self, query: &str) -> Result<Zone> {
        self.match_one(query).map(Clone::clone)
    }

    /// Drop `zone` from the index if its dataset no longer exists —
    /// called after any operation that might have destroyed it (an
    /// explicit `destroy`/`undeploy`, or a `temporary` zone's implicit
    /// self-destruction at the end of `stop`).
    fn sync_after(&mut self, zone: &Zone) {
        if !FileSystem::exists(&self.runner, zone.identifier()) {
            self.registry.remove(zone.uuid());
            self.order.shift_remove(zone.uuid());
        }
    }

    /// Build a new zone from `spec`, per the workspace spec's create flow
    /// (§4.7): run the creation-only handlers (`variable`, `include`,
    /// `base`, `name`, `provision`) against the local spec, let `base`
    /// decide where the dataset comes from, provision it, then take the
    /// `initial` snapshot of the fully-provisioned result.
    pub fn create(&mut self, mut spec: Value) -> Result<Zone> {
        let zone_root = self.file_system.identifier().clone();
        let mut manager = Manager::new(handlers::creation_handlers(self.runner.clone(), zone_root.clone()));
        let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        manager.read(&mut spec, &base)?;

        let uuid = Uuid::new_v4().to_string();
        let target_identifier = zone_root.child(&uuid);
        let mut persistence = Sidecar::open(sidecar_path(&zone_root, &uuid))?;

        let mut ctx = ZoneContext::new(self.runner.clone());
        ctx.file_system_identifier = Some(target_identifier.clone());
        ctx.persistence = Some(persistence.clone());

        let outcome = (|| -> Result<Zone> {
            manager.commit(Phase::BeforeCreateZone, &mut ctx)?;

            let file_system = match ctx.file_system.take() {
                None => FileSystem::create(self.runner.clone(), target_identifier.clone())?,
                // `base` always clones/renames directly onto `target_identifier`; a
                // mismatch here means a handler placed the dataset somewhere the
                // store never asked for, and registering it under the wrong
                // identifier would silently corrupt the store's index.
                Some(fs) if fs.identifier() != &target_identifier => {
                    return Err(Error::IllegalFileSystemIdentifier(fs.identifier().to_string()));
                }
                Some(fs) => fs,
            };
            if !file_system.is_mounted() {
                file_system.mount()?;
            }

            persistence = ctx.persistence.take().unwrap_or(persistence);
            #[allow(clippy::expect_used)]
            persistence
                .data_mut()
                .as_mapping_mut()
                .expect("sidecar root is a mapping")
                .insert(Value::from("local"), spec.clone());
            persistence.flush()?;

            let zone = Zone::from_parts(
                self.runner.clone(),
                zone_root.clone(),
                file_system.identifier().clone(),
                persistence.clone(),
            );

            manager.commit(Phase::AfterCreateZone, &mut ctx)?;
            zone.create_snapshot("initial")?;

            if let Some(name) = zone.name() {
                if self.registry.contains(&name) {
                    return Err(Error::NameAlreadyUsed(name));
                }
            }
            Ok(zone)
        })();

        match outcome {
            Ok(zone) => {
                self.registry.insert(zone.uuid().to_string(), zone.name(), zone.clone())?;
                self.order.insert(zone.uuid().to_string());
                Ok(zone)
            }
            Err(err) => {
                manager.rollback()?;
                persistence.destroy()?;
                if FileSystem::exists(&self.runner, &target_identifier) {
                    FileSystem::open(self.runner.clone(), target_identifier)?.destroy()?;
                }
                Err(err)
            }
        }
    }

    pub fn deploy(&mut self, spec: Value) -> Result<Zone> {
        let zone = self.create(spec)?;
        zone.up()?;
        Ok(zone)
    }

    pub fn run(&mut self, mut spec: Value) -> Result<Zone> {
        if !spec.is_mapping() {
            spec = zonys_core::value::empty_mapping();
        }
        if let Value::Mapping(map) = &mut spec {
            map.insert(Value::from("temporary"), Value::from(true));
        }
        let zone = self.create(spec)?;
        zone.up()?;
        Ok(zone)
    }

    pub fn redeploy(&mut self, query: &str, spec: Value) -> Result<Zone> {
        let zone = self.resolve(query)?;
        zone.undeploy()?;
        self.sync_after(&zone);
        self.deploy(spec)
    }

    pub fn replace(&mut self, query: &str, spec: Value) -> Result<Zone> {
        let zone = self.resolve(query)?;
        zone.destroy()?;
        self.sync_after(&zone);
        self.create(spec)
    }

    pub fn start(&mut self, query: &str) -> Result<()> {
        self.resolve(query)?.start()
    }

    pub fn stop(&mut self, query: &str) -> Result<()> {
        let zone = self.resolve(query)?;
        let result = zone.stop();
        self.sync_after(&zone);
        result
    }

    pub fn restart(&mut self, query: &str) -> Result<()> {
        let zone = self.resolve(query)?;
        let result = zone.restart();
        self.sync_after(&zone);
        result
    }

    pub fn up(&mut self, query: &str) -> Result<()> {
        self.resolve(query)?.up()
    }

    pub fn down(&mut self, query: &str) -> Result<()> {
        let zone = self.resolve(query)?;
        let result = zone.down();
        self.sync_after(&zone);
        result
    }

    pub fn reup(&mut self, query: &str) -> Result<()> {
        let zone = self.resolve(query)?;
        let result = zone.reup();
        self.sync_after(&zone);
        result
    }

    pub fn undeploy(&mut self, query: &str) -> Result<()> {
        let zone = self.resolve(query)?;
        zone.undeploy()?;
        self.sync_after(&zone);
        Ok(())
    }

    pub fn destroy(&mut self, query: &str) -> Result<()> {
        let zone = self.resolve(query)?;
        zone.destroy()?;
        self.sync_after(&zone);
        Ok(())
    }

    pub fn send(&self, query: &str, sink: &mut dyn std::io::Write, compress: bool) -> Result<()> {
        self.match_one(query)?.send(sink, compress)
    }

    pub fn console(&self, query: &str) -> Result<std::process::ExitStatus> {
        self.match_one(query)?.console()
    }

    pub fn execute(
        &self,
        query: &str,
        command: &[&str],
        stdin: std::process::Stdio,
        stdout: std::process::Stdio,
        stderr: std::process::Stdio,
    ) -> Result<std::process::ExitStatus> {
        self.match_one(query)?.execute_io(command, stdin, stdout, stderr)
    }

    /// Start every zone whose merged configuration sets `autostart: true`,
    /// in discovery order.
    pub fn autostart(&self) -> Result<()> {
        for zone in self.list() {
            if zone.auto_start()? {
                zone.up()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
