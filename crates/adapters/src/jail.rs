// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The jail adapter: creating, querying, and executing inside FreeBSD
//! jails, plus the [`temporary`] scoped-provisioning jail used by the
//! `provision`/`execute` handlers.

use crate::command::CommandRunner;
use crate::mount::devfs;
use crate::mount::Mountpoint as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;
use zonys_core::{Error, Result};

/// An unopened jail name. `exists` queries the kernel's jail table via `jls`.
pub struct JailIdentifier {
    name: String,
    runner: Arc<dyn CommandRunner>,
}

/// A jail parameter value as accepted by `jail -c`: booleans render as
/// `1`/`0`, `None` emits the bare key (e.g. `persist`).
#[derive(Debug, Clone)]
pub enum JailParam {
    Bool(bool),
    String(String),
    Flag,
}

impl From<bool> for JailParam {
    fn from(v: bool) -> Self {
        JailParam::Bool(v)
    }
}

impl From<&str> for JailParam {
    fn from(v: &str) -> Self {
        JailParam::String(v.to_string())
    }
}

impl From<String> for JailParam {
    fn from(v: String) -> Self {
        JailParam::String(v)
    }
}

fn render_param(key: &str, value: &JailParam) -> String {
    match value {
        JailParam::Bool(true) => format!("{key}=1"),
        JailParam::Bool(false) => format!("{key}=0"),
        JailParam::String(v) => format!("{key}={v}"),
        JailParam::Flag => key.to_string(),
    }
}

impl JailIdentifier {
    pub fn new(name: impl Into<String>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            name: name.into(),
            runner,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Query the kernel's jail table (`jls -N --libxo json`) for a jail
    /// with this name.
    pub fn exists(&self) -> Result<bool> {
        let output = self
            .runner
            .run_checked(&["jls", "-N", "--libxo", "json"])?;
        let parsed: serde_json::Value = serde_json::from_slice(&output)
            .map_err(|e| Error::ExternalCommand {
                argv: vec!["jls".into()],
                stderr: e.to_string(),
            })?;
        let entries = parsed
            .pointer("/jail-information/jail")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        Ok(entries
            .iter()
            .any(|entry| entry.get("name").and_then(|n| n.as_str()) == Some(self.name.as_str())))
    }

    /// Build a persistent jail rooted at `path`. Always contributes
    /// `exec.clean` and `allow.raw_sockets=1`; `params` may override or
    /// extend those.
    pub fn create(&self, path: &Path, params: &[(&str, JailParam)]) -> Result<JailHandle> {
        if self.exists()? {
            return Err(Error::AlreadyExists(self.name.clone()));
        }

        let mut rendered = vec!["exec.clean".to_string()];
        for (key, value) in params {
            rendered.push(render_param(key, value));
        }
        rendered.push(format!("name={}", self.name));
        rendered.push(format!("path={}", path.display()));
        rendered.push("allow.raw_sockets=1".to_string());

        let mut argv: Vec<&str> = vec!["jail", "-c"];
        argv.extend(rendered.iter().map(String::as_str));
        argv.push("persist");

        self.runner.run_checked(&argv)?;
        Ok(JailHandle {
            name: self.name.clone(),
            runner: self.runner.clone(),
        })
    }

    pub fn open(&self) -> Result<JailHandle> {
        if !self.exists()? {
            return Err(Error::NotFound(self.name.clone()));
        }
        Ok(JailHandle {
            name: self.name.clone(),
            runner: self.runner.clone(),
        })
    }
}

/// A handle to a running jail.
pub struct JailHandle {
    name: String,
    runner: Arc<dyn CommandRunner>,
}

impl JailHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run a command inside the jail via `jexec -l`.
    pub fn execute(&self, command: &[&str]) -> Result<Vec<u8>> {
        let mut argv = vec!["jexec", "-l", self.name.as_str()];
        argv.extend(command);
        self.runner.run_checked(&argv)
    }

    pub fn destroy(&self) -> Result<()> {
        self.runner.run_checked(&["jail", "-r", &self.name])?;
        Ok(())
    }
}

/// Acquire a scoped jail at `path` for the duration of `body`, tearing it
/// down (and reverting every side effect it set up) on every exit path —
/// used by the `provision`/`execute` handlers' `afterCreate`/`beforeDestroy`
/// hooks, which need a running userland without the zone being "started".
///
/// Sequence: mount a devfs under `path/dev` (hidden by default, then
/// unhidden in full — a throwaway provisioning jail needs full device
/// access, unlike a started zone's selectively-unhidden `mount` handler),
/// back up and replace `path/etc/resolv.conf` with the host's, create a
/// jail inheriting the host IP stack, run `ldconfig start`. On the way out:
/// `ldconfig stop`, destroy the jail, unmount devfs, restore `resolv.conf`.
pub fn temporary<R>(
    name: &str,
    path: &Path,
    params: &[(&str, JailParam)],
    runner: Arc<dyn CommandRunner>,
    body: impl FnOnce(&JailHandle) -> Result<R>,
) -> Result<R> {
    let resolv_conf_path = path.join("etc").join("resolv.conf");
    let backup = resolv_conf_path
        .exists()
        .then(|| std::fs::read(&resolv_conf_path))
        .transpose()?;
    if backup.is_some() {
        std::fs::remove_file(&resolv_conf_path)?;
    }
    std::fs::copy(PathBuf::from("/etc/resolv.conf"), &resolv_conf_path)?;

    let devfs_destination = path.join("dev");
    let devfs_mountpoint = devfs::DevfsMountpoint::new(devfs_destination, runner.clone());
    let devices = if devfs_mountpoint.exists()? {
        devfs_mountpoint.open()?
    } else {
        devfs_mountpoint.mount()?
    };
    devices.rules().unhide_all()?;

    let identifier = JailIdentifier::new(name, runner.clone());
    let mut jail_params: Vec<(&str, JailParam)> = vec![
        ("ip4", "inherit".into()),
        ("allow.sysvipc", true.into()),
    ];
    jail_params.extend(params.iter().map(|(k, v)| (*k, v.clone())));

    let jail = identifier.create(path, &jail_params);
    if let Ok(handle) = &jail {
        if let Err(err) = handle.execute(&["/etc/rc.d/ldconfig", "start"]) {
            warn!(jail = name, error = %err, "ldconfig start failed in temporary jail");
        }
    }

    let outcome = match &jail {
        Ok(handle) => body(handle),
        Err(err) => Err(Error::NotFound(format!("{name}: {err}"))),
    };

    if let Ok(handle) = &jail {
        if let Err(err) = handle.execute(&["/etc/rc.d/ldconfig", "stop"]) {
            warn!(jail = name, error = %err, "ldconfig stop failed during temporary jail teardown");
        }
        if let Err(err) = handle.destroy() {
            warn!(jail = name, error = %err, "failed to destroy temporary jail");
        }
    }
    if let Err(err) = devices.unmount() {
        warn!(path = %path.display(), error = %err, "failed to unmount temporary devfs");
    }
    if let Some(contents) = backup {
        std::fs::write(&resolv_conf_path, contents)?;
    } else {
        let _ = std::fs::remove_file(&resolv_conf_path);
    }

    outcome
}

#[cfg(test)]
#[path = "jail_tests.rs"]
mod tests;
