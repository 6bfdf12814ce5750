// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `mount`: a list of devfs/nullfs/zfs entries, each mounted at
//! `before_start_zone` and unmounted at `after_stop_zone`, with symmetric
//! rollback. The `zfs` kind additionally contributes jail parameters and
//! jails/unjails the dataset around start/stop.

use crate::context::ZoneContext;
use std::path::Path;
use std::sync::Arc;
use zonys_adapters::command::CommandRunner;
use zonys_adapters::cow_fs::FileSystem;
use zonys_adapters::mount::{devfs, nullfs, Mountpoint};
use zonys_config::{CommitBinding, Handler, Phase, RollbackThunk};
use zonys_core::{merge_additive, Error, FileSystemIdentifier, Result, Value, ValueExt};

pub struct MountHandler {
    runner: Arc<dyn CommandRunner>,
}

impl MountHandler {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn open_or_mount(mountpoint: &dyn Mountpoint) -> Result<()> {
        if mountpoint.exists()? {
            mountpoint.open()?;
        } else {
            mountpoint.mount()?;
        }
        Ok(())
    }
}

impl Handler<ZoneContext> for MountHandler {
    fn field(&self) -> &'static str {
        "mount"
    }

    fn on_commit(
        &self,
        phase: Phase,
        binding: &CommitBinding,
        ctx: &mut ZoneContext,
        _normalized: &Value,
    ) -> Result<Option<RollbackThunk>> {
        let entries = binding
            .options
            .as_sequence()
            .ok_or_else(|| Error::InvalidConfiguration("mount: expected a list".into()))?
            .clone();
        let zone_root = ctx
            .file_system
            .as_ref()
            .map(FileSystem::path)
            .unwrap_or_else(|| Path::new("/").to_path_buf());

        match phase {
            Phase::BeforeStartZone => {
                for entry in &entries {
                    let fields = entry.as_string_map();
                    if let Some(opts) = fields.get("devfs") {
                        self.mount_devfs(&zone_root, opts)?;
                    } else if let Some(opts) = fields.get("nullfs") {
                        self.mount_nullfs(&zone_root, opts)?;
                    } else if let Some(opts) = fields.get("zfs") {
                        self.prepare_zfs(opts, ctx)?;
                    }
                }
                let runner = self.runner.clone();
                let zone_root = zone_root.clone();
                Ok(Some(Box::new(move || {
                    let handler = MountHandler::new(runner);
                    for entry in &entries {
                        let fields = entry.as_string_map();
                        if let Some(opts) = fields.get("devfs") {
                            handler.unmount_devfs(&zone_root, opts)?;
                        } else if let Some(opts) = fields.get("nullfs") {
                            handler.unmount_nullfs(&zone_root, opts)?;
                        } else if let Some(opts) = fields.get("zfs") {
                            handler.unjail_zfs(opts)?;
                        }
                    }
                    Ok(())
                })))
            }
            Phase::AfterStartZone => {
                let jail_name = ctx.jail.as_ref().map(|j| j.name().to_string());
                let Some(jail_name) = jail_name else {
                    return Ok(None);
                };
                for entry in &entries {
                    let fields = entry.as_string_map();
                    if let Some(opts) = fields.get("zfs") {
                        self.attach_zfs(opts, &jail_name)?;
                    }
                }
                let runner = self.runner.clone();
                Ok(Some(Box::new(move || {
                    let handler = MountHandler::new(runner);
                    for entry in &entries {
                        let fields = entry.as_string_map();
                        if let Some(opts) = fields.get("zfs") {
                            handler.detach_zfs(opts, &jail_name)?;
                        }
                    }
                    Ok(())
                })))
            }
            Phase::BeforeStopZone => {
                let jail_name = ctx.jail.as_ref().map(|j| j.name().to_string());
                if let Some(jail_name) = jail_name {
                    for entry in &entries {
                        let fields = entry.as_string_map();
                        if let Some(opts) = fields.get("zfs") {
                            self.detach_zfs(opts, &jail_name)?;
                        }
                    }
                }
                Ok(None)
            }
            Phase::AfterStopZone => {
                for entry in &entries {
                    let fields = entry.as_string_map();
                    if let Some(opts) = fields.get("devfs") {
                        self.unmount_devfs(&zone_root, opts)?;
                    } else if let Some(opts) = fields.get("nullfs") {
                        self.unmount_nullfs(&zone_root, opts)?;
                    } else if let Some(opts) = fields.get("zfs") {
                        self.unjail_zfs(opts)?;
                    }
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}

impl MountHandler {
    fn devfs_destination(&self, zone_root: &Path, opts: &Value) -> Result<std::path::PathBuf> {
        let relative = opts
            .as_string_map()
            .get("path")
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| "/dev".to_string());
        let path = Path::new(&relative);
        if !path.is_absolute() {
            return Err(Error::InvalidConfiguration(
                "mount.devfs: path must be absolute".into(),
            ));
        }
        Ok(zone_root.join(path.strip_prefix("/").unwrap_or(path)))
    }

    fn mount_devfs(&self, zone_root: &Path, opts: &Value) -> Result<()> {
        let destination = self.devfs_destination(zone_root, opts)?;
        let mountpoint = devfs::DevfsMountpoint::new(destination, self.runner.clone());
        let handle = if mountpoint.exists()? {
            mountpoint.open()?
        } else {
            mountpoint.mount()?
        };
        let include = opts
            .as_string_map()
            .get("include")
            .and_then(|v| v.as_sequence().cloned())
            .unwrap_or_default();
        for pattern in include.iter().filter_map(|v| v.as_str()) {
            handle.rules().unhide(pattern)?;
        }
        Ok(())
    }

    fn unmount_devfs(&self, zone_root: &Path, opts: &Value) -> Result<()> {
        let destination = self.devfs_destination(zone_root, opts)?;
        let mountpoint = devfs::DevfsMountpoint::new(destination, self.runner.clone());
        if mountpoint.exists()? {
            mountpoint.open()?.unmount()?;
        }
        Ok(())
    }

    fn nullfs_mountpoint(&self, zone_root: &Path, opts: &Value) -> Result<nullfs::NullfsMountpoint> {
        let fields = opts.as_string_map();
        let source = fields
            .get("source")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::InvalidConfiguration("mount.nullfs: missing source".into()))?
            .to_string();
        let destination = fields
            .get("destination")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::InvalidConfiguration("mount.nullfs: missing destination".into()))?;
        let path = Path::new(destination);
        if !path.is_absolute() {
            return Err(Error::InvalidConfiguration(
                "mount.nullfs: destination must be absolute".into(),
            ));
        }
        let rebased = zone_root.join(path.strip_prefix("/").unwrap_or(path));
        let read_only = fields
            .get("read_only")
            .and_then(|v| v.as_bool())
            .unwrap_or(true);
        Ok(nullfs::NullfsMountpoint::new(
            source,
            rebased,
            read_only,
            self.runner.clone(),
        ))
    }

    fn mount_nullfs(&self, zone_root: &Path, opts: &Value) -> Result<()> {
        let mountpoint = self.nullfs_mountpoint(zone_root, opts)?;
        Self::open_or_mount(&mountpoint)
    }

    fn unmount_nullfs(&self, zone_root: &Path, opts: &Value) -> Result<()> {
        let mountpoint = self.nullfs_mountpoint(zone_root, opts)?;
        if mountpoint.exists()? {
            mountpoint.open()?.unmount()?;
        }
        Ok(())
    }

    fn zfs_identifier(&self, opts: &Value) -> Result<FileSystemIdentifier> {
        let name = opts
            .as_str()
            .ok_or_else(|| Error::InvalidConfiguration("mount.zfs: expected a dataset name".into()))?;
        FileSystemIdentifier::parse(name)
    }

    fn prepare_zfs(&self, opts: &Value, ctx: &mut ZoneContext) -> Result<()> {
        let identifier = self.zfs_identifier(opts)?;
        FileSystem::open(self.runner.clone(), identifier)?.set_jailed()?;

        let mut overrides = zonys_core::value::empty_mapping();
        if let Value::Mapping(map) = &mut overrides {
            map.insert(Value::from("allow.mount"), Value::from(true));
            map.insert(Value::from("allow.mount.zfs"), Value::from(true));
            map.insert(Value::from("enforce_statfs"), Value::from(0));
            map.insert(Value::from("children.max"), Value::from(100));
        }
        merge_additive(&mut ctx.jail_configuration, overrides);
        Ok(())
    }

    fn attach_zfs(&self, opts: &Value, jail_name: &str) -> Result<()> {
        let identifier = self.zfs_identifier(opts)?;
        let fs = FileSystem::open(self.runner.clone(), identifier.clone())?;
        fs.jail(jail_name)?;
        self.runner
            .run_checked(&["jexec", "-l", jail_name, "zfs", "mount", &identifier.to_string()])?;
        Ok(())
    }

    fn detach_zfs(&self, opts: &Value, jail_name: &str) -> Result<()> {
        let identifier = self.zfs_identifier(opts)?;
        self.runner
            .run_checked(&["jexec", "-l", jail_name, "zfs", "unmount", &identifier.to_string()])?;
        FileSystem::open(self.runner.clone(), identifier)?.unjail(jail_name)?;
        Ok(())
    }

    fn unjail_zfs(&self, opts: &Value) -> Result<()> {
        let identifier = self.zfs_identifier(opts)?;
        FileSystem::open(self.runner.clone(), identifier)?.inherit_jailed()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "mount_tests.rs"]
mod tests;
