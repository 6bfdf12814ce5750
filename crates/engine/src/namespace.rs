// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`Namespace`]: a root CoW-FS dataset grouping a [`ZoneStore`], a stub
//! volume store, and host service registration.
//!
//! Grounded on `original_source/zonys/core/namespace.py`'s `Handle`/
//! `_Service`: on open, ensure the root dataset exists and is mounted and
//! that its `zone`/`storage` children exist; own a `zonys.core.yaml`
//! sidecar; expose `service.enable()`/`disable()` registration against the
//! host's `rc.d` and `sysrc` tooling.

use crate::store::ZoneStore;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Arc;
use zonys_adapters::command::CommandRunner;
use zonys_adapters::cow_fs::FileSystem;
use zonys_core::{FileSystemIdentifier, Result};
use zonys_storage::Sidecar;

/// The namespace used when no `-n/--namespace` override is given.
pub const DEFAULT_IDENTIFIER: &str = "zroot/zonys";

/// The volume store is a stub (§9(b) of the workspace spec): the `storage`
/// child dataset is ensured to exist, but no volume CRUD is implemented —
/// every collection operation reports empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct VolumeStore;

impl VolumeStore {
    pub fn len(&self) -> usize {
        0
    }

    pub fn is_empty(&self) -> bool {
        true
    }

    pub fn list(&self) -> Vec<String> {
        Vec::new()
    }
}

pub struct Namespace {
    runner: Arc<dyn CommandRunner>,
    file_system: FileSystem,
    persistence: Sidecar,
    zone_store: ZoneStore,
    volume_store: VolumeStore,
}

impl Namespace {
    /// Open (creating if necessary) the namespace dataset at `identifier`,
    /// mount it, and ensure its `zone` and `storage` children exist.
    pub fn open(runner: Arc<dyn CommandRunner>, identifier: FileSystemIdentifier) -> Result<Self> {
        let file_system = if FileSystem::exists(&runner, &identifier) {
            FileSystem::open(runner.clone(), identifier)?
        } else {
            FileSystem::create(runner.clone(), identifier)?
        };
        if !file_system.is_mounted() {
            file_system.mount()?;
        }

        let children = file_system.children();
        if !children.contains("storage") {
            children.create("storage")?;
        }

        let persistence = Sidecar::open(file_system.path().join("zonys.core.yaml"))?;
        let zone_store = ZoneStore::open(runner.clone(), &file_system)?;

        Ok(Self {
            runner,
            file_system,
            persistence,
            zone_store,
            volume_store: VolumeStore,
        })
    }

    pub fn identifier(&self) -> &FileSystemIdentifier {
        self.file_system.identifier()
    }

    /// The namespace's identifier rendered the way the CLI's `-n` flag and
    /// the service registration list both expect: `a/b/c`.
    pub fn display_identifier(&self) -> String {
        self.identifier().to_string()
    }

    pub fn is_default(&self) -> bool {
        self.display_identifier() == DEFAULT_IDENTIFIER
    }

    pub fn path(&self) -> PathBuf {
        self.file_system.path()
    }

    pub fn zone_store(&self) -> &ZoneStore {
        &self.zone_store
    }

    pub fn zone_store_mut(&mut self) -> &mut ZoneStore {
        &mut self.zone_store
    }

    pub fn volume_store(&self) -> &VolumeStore {
        &self.volume_store
    }

    pub fn persistence(&self) -> &Sidecar {
        &self.persistence
    }

    pub fn service(&self) -> Service {
        Service {
            identifier: self.display_identifier(),
            runner: self.runner.clone(),
        }
    }
}

const RC_PATH: &str = "/usr/local/etc/rc.d/zonys";

const RC_DEFINITION: &str = r#"#!/bin/sh

# zonys
# This file is generated.
#
# PROVIDE: zonys
# REQUIRE: DAEMON
# KEYWORD: shutdown

. /etc/rc.subr

name=zonys
rcvar=${name}_enable

: ${zonys_enable:=NO}
: ${zonys_program:=zonys}
: ${zonys_namespaces:=}

load_rc_config ${name}

PATH="${PATH}:/usr/local/sbin:/usr/local/bin"

start_cmd="zonys_start"
stop_cmd="zonys_stop"
restart_cmd="zonys_restart"
status_cmd="zonys_status"

zonys_start()
{
    ${zonys_program} service start ${zonys_namespaces}
}

zonys_stop()
{
    ${zonys_program} service stop ${zonys_namespaces}
}

zonys_restart()
{
    ${zonys_program} service restart ${zonys_namespaces}
}

zonys_status()
{
    ${zonys_program} service status ${zonys_namespaces}
}

run_rc_command "$1"
"#;

/// A namespace's host service registration: the generated `rc.d` script and
/// the `zonys_namespaces` `sysrc` list every enabled namespace appends
/// itself to.
pub struct Service {
    identifier: String,
    runner: Arc<dyn CommandRunner>,
}

impl Service {
    pub fn is_enabled(&self) -> Result<bool> {
        let output = self.runner.run_checked(&["service", "-e"])?;
        Ok(String::from_utf8_lossy(&output)
            .lines()
            .any(|line| line == RC_PATH))
    }

    pub fn is_disabled(&self) -> Result<bool> {
        Ok(!self.is_enabled()?)
    }

    /// The host-wide list of namespace identifiers registered for service
    /// management, read from the `zonys_namespaces` `rc.conf` variable.
    pub fn namespaces(&self) -> Result<Vec<String>> {
        let output = self.runner.run(&["sysrc", "-n", "zonys_namespaces"])?;
        if !output.status.success() {
            return Ok(Vec::new());
        }
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if value.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(value.split(' ').map(str::to_string).collect())
        }
    }

    fn set_namespaces(&self, namespaces: &[String]) -> Result<()> {
        self.runner
            .run_checked(&["sysrc", &format!("zonys_namespaces={}", namespaces.join(" "))])?;
        Ok(())
    }

    /// Install the generated `rc.d` script, enable it in `rc.conf`, and
    /// append this namespace to the host-wide `zonys_namespaces` list.
    pub fn enable(&self) -> Result<()> {
        let path = PathBuf::from(RC_PATH);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, RC_DEFINITION)?;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o555))?;
        self.runner.run_checked(&["sysrc", "zonys_enable=YES"])?;

        let mut namespaces = self.namespaces()?;
        if !namespaces.iter().any(|n| n == &self.identifier) {
            namespaces.push(self.identifier.clone());
            self.set_namespaces(&namespaces)?;
        }
        Ok(())
    }

    /// Remove this namespace from the host-wide `zonys_namespaces` list.
    /// Leaves the `rc.d` script and `zonys_enable` alone — other namespaces
    /// may still depend on the service being enabled.
    pub fn disable(&self) -> Result<()> {
        let mut namespaces = self.namespaces()?;
        if let Some(position) = namespaces.iter().position(|n| n == &self.identifier) {
            namespaces.remove(position);
            self.set_namespaces(&namespaces)?;
        }
        Ok(())
    }

    pub fn start(&self, namespaces: &[String]) -> Result<()> {
        let mut argv = vec!["service".to_string(), "zonys".to_string(), "start".to_string()];
        argv.extend(namespaces.iter().cloned());
        self.runner
            .run_checked(&argv.iter().map(String::as_str).collect::<Vec<_>>())?;
        Ok(())
    }

    pub fn stop(&self, namespaces: &[String]) -> Result<()> {
        let mut argv = vec!["service".to_string(), "zonys".to_string(), "stop".to_string()];
        argv.extend(namespaces.iter().cloned());
        self.runner
            .run_checked(&argv.iter().map(String::as_str).collect::<Vec<_>>())?;
        Ok(())
    }

    pub fn restart(&self, namespaces: &[String]) -> Result<()> {
        let mut argv = vec!["service".to_string(), "zonys".to_string(), "restart".to_string()];
        argv.extend(namespaces.iter().cloned());
        self.runner
            .run_checked(&argv.iter().map(String::as_str).collect::<Vec<_>>())?;
        Ok(())
    }

    pub fn status(&self) -> Result<Vec<u8>> {
        self.runner.run_checked(&["service", "zonys", "status"])
    }
}

#[cfg(test)]
#[path = "namespace_tests.rs"]
mod tests;
