// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `provision`: a list of one-shot actions run once, in order, against the
//! freshly created zone's dataset, during `after_create_zone`.
//!
//! Each action is one of `archive`, `command`, `directory`, `file`, `git`,
//! `link`, `package`, `path`. Destination paths inside the zone must be
//! absolute (they're rejoined under the zone's mountpoint); `command` and
//! `package` run inside a throwaway [`zonys_adapters::jail::temporary`]
//! jail since they need a live userland the plain dataset doesn't provide.

use crate::context::ZoneContext;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use zonys_adapters::command::CommandRunner;
use zonys_adapters::jail;
use zonys_config::{CommitBinding, Handler, Phase, RollbackThunk};
use zonys_core::{Error, Result, Value, ValueExt};

pub struct ProvisionHandler {
    runner: Arc<dyn CommandRunner>,
}

impl ProvisionHandler {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

/// Rebase an absolute in-zone path under the zone's mountpoint, e.g.
/// `/etc/rc.conf` + zone root `/testpool/zonys/zone/<uuid>` becomes
/// `/testpool/zonys/zone/<uuid>/etc/rc.conf`.
fn rebase(zone_root: &Path, absolute: &str) -> Result<PathBuf> {
    let path = Path::new(absolute);
    if !path.is_absolute() {
        return Err(Error::InvalidConfiguration(format!(
            "provision: path must be absolute: {absolute}"
        )));
    }
    Ok(zone_root.join(path.strip_prefix("/").unwrap_or(path)))
}

fn resolve_source(base: &Path, source: &str) -> PathBuf {
    let path = Path::new(source);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

impl ProvisionHandler {
    fn run_directory(&self, zone_root: &Path, action: &Value) -> Result<()> {
        let fields = action.as_string_map();
        let path = fields
            .get("path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::InvalidConfiguration("directory: missing path".into()))?;
        let target = rebase(zone_root, path)?;
        std::fs::create_dir_all(target)?;
        Ok(())
    }

    fn run_file(&self, zone_root: &Path, action: &Value) -> Result<()> {
        let fields = action.as_string_map();
        let path = fields
            .get("path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::InvalidConfiguration("file: missing path".into()))?;
        let target = rebase(zone_root, path)?;
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if !target.exists() {
            std::fs::write(&target, "")?;
        }
        if let Some(content) = fields.get("content").and_then(|v| v.as_str()) {
            std::fs::write(&target, content)?;
        }
        if let Some(prepend) = fields.get("prepend").and_then(|v| v.as_str()) {
            let existing = std::fs::read_to_string(&target)?;
            std::fs::write(&target, format!("{prepend}{existing}"))?;
        }
        if let Some(append) = fields.get("append").and_then(|v| v.as_str()) {
            use std::io::Write;
            let mut handle = std::fs::OpenOptions::new().append(true).open(&target)?;
            handle.write_all(append.as_bytes())?;
        }
        Ok(())
    }

    fn run_link(&self, zone_root: &Path, action: &Value) -> Result<()> {
        let fields = action.as_string_map();
        let source = fields
            .get("source")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::InvalidConfiguration("link: missing source".into()))?;
        let destination = fields
            .get("destination")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::InvalidConfiguration("link: missing destination".into()))?;
        if !Path::new(source).is_absolute() {
            return Err(Error::InvalidConfiguration(
                "link: source must be absolute".into(),
            ));
        }
        let target = rebase(zone_root, destination)?;
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::os::unix::fs::symlink(source, target)?;
        Ok(())
    }

    fn run_path(&self, zone_root: &Path, base: &Path, action: &Value) -> Result<()> {
        let fields = action.as_string_map();
        let source = fields
            .get("source")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::InvalidConfiguration("path: missing source".into()))?;
        let destination = fields
            .get("destination")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::InvalidConfiguration("path: missing destination".into()))?;
        let target = rebase(zone_root, destination)?;
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let resolved_source = resolve_source(base, source);
        if resolved_source.is_dir() {
            copy_dir_recursive(&resolved_source, &target)?;
        } else {
            std::fs::copy(&resolved_source, &target)?;
        }
        Ok(())
    }

    fn run_archive(&self, zone_root: &Path, action: &Value) -> Result<()> {
        let fields = action.as_string_map();
        let source = fields
            .get("source")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::InvalidConfiguration("archive: missing source".into()))?;
        let destination = fields
            .get("destination")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::InvalidConfiguration("archive: missing destination".into()))?;
        let target = rebase(zone_root, destination)?;
        std::fs::create_dir_all(&target)?;

        let staged = if source.starts_with("http://") || source.starts_with("https://") {
            let staging = target.join(".provision-archive-download");
            self.runner
                .run_checked(&["fetch", "-o", &staging.to_string_lossy(), source])?;
            staging
        } else {
            PathBuf::from(source.strip_prefix("file://").unwrap_or(source))
        };
        self.runner.run_checked(&[
            "tar",
            "-xf",
            &staged.to_string_lossy(),
            "-C",
            &target.to_string_lossy(),
        ])?;
        if staged.file_name().and_then(|n| n.to_str()) == Some(".provision-archive-download") {
            let _ = std::fs::remove_file(&staged);
        }
        Ok(())
    }

    fn run_git(&self, zone_root: &Path, action: &Value) -> Result<()> {
        let fields = action.as_string_map();
        let url = fields
            .get("url")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::InvalidConfiguration("git: missing url".into()))?;
        let path = fields
            .get("path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::InvalidConfiguration("git: missing path".into()))?;
        let target = rebase(zone_root, path)?;
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.runner
            .run_checked(&["git", "clone", url, &target.to_string_lossy()])?;
        if let Some(object) = fields.get("object").and_then(|v| v.as_str()) {
            self.runner.run_checked(&[
                "git",
                "-C",
                &target.to_string_lossy(),
                "checkout",
                object,
            ])?;
        }
        Ok(())
    }

    fn run_package(&self, zone_name: &str, zone_root: &Path, action: &Value) -> Result<()> {
        let packages: Vec<String> = match action {
            Value::Sequence(seq) => seq
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => return Err(Error::InvalidConfiguration("package: expected a list".into())),
        };
        if packages.is_empty() {
            return Ok(());
        }
        let runner = self.runner.clone();
        jail::temporary(zone_name, zone_root, &[], runner, |handle| {
            let mut argv = vec!["pkg", "install", "-y"];
            argv.extend(packages.iter().map(String::as_str));
            handle.execute(&argv)?;
            Ok(())
        })
    }

    fn run_command(&self, zone_name: &str, zone_root: &Path, command: &str) -> Result<()> {
        let runner = self.runner.clone();
        jail::temporary(zone_name, zone_root, &[], runner, |handle| {
            handle.execute(&["/bin/sh", "-c", command])?;
            Ok(())
        })
    }
}

fn copy_dir_recursive(source: &Path, destination: &Path) -> Result<()> {
    std::fs::create_dir_all(destination)?;
    for entry in std::fs::read_dir(source)? {
        let entry = entry?;
        let dest_path = destination.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &dest_path)?;
        } else {
            std::fs::copy(entry.path(), &dest_path)?;
        }
    }
    Ok(())
}

impl Handler<ZoneContext> for ProvisionHandler {
    fn field(&self) -> &'static str {
        "provision"
    }

    fn on_commit(
        &self,
        phase: Phase,
        binding: &CommitBinding,
        ctx: &mut ZoneContext,
        _normalized: &Value,
    ) -> Result<Option<RollbackThunk>> {
        if phase != Phase::AfterCreateZone {
            return Ok(None);
        }
        let actions = binding
            .options
            .as_sequence()
            .ok_or_else(|| Error::InvalidConfiguration("provision: expected a list".into()))?;
        let zone_root = ctx
            .file_system
            .as_ref()
            .ok_or_else(|| Error::InvalidConfiguration("provision: no file system".into()))?
            .path();
        let zone_name = ctx
            .file_system_identifier
            .as_ref()
            .map(|id| id.last().to_string())
            .ok_or_else(|| Error::InvalidConfiguration("provision: no zone identifier".into()))?;

        for action in actions {
            let fields = action.as_string_map();
            if let Some(directory) = fields.get("directory") {
                self.run_directory(&zone_root, directory)?;
            } else if let Some(file) = fields.get("file") {
                self.run_file(&zone_root, file)?;
            } else if let Some(link) = fields.get("link") {
                self.run_link(&zone_root, link)?;
            } else if let Some(path) = fields.get("path") {
                self.run_path(&zone_root, binding.base, path)?;
            } else if let Some(archive) = fields.get("archive") {
                self.run_archive(&zone_root, archive)?;
            } else if let Some(git) = fields.get("git") {
                self.run_git(&zone_root, git)?;
            } else if let Some(package) = fields.get("package") {
                self.run_package(&zone_name, &zone_root, package)?;
            } else if let Some(command) = fields.get("command").and_then(|v| v.as_str()) {
                self.run_command(&zone_name, &zone_root, command)?;
            } else if let Some(command) = action.as_str() {
                self.run_command(&zone_name, &zone_root, command)?;
            } else {
                return Err(Error::InvalidConfiguration(format!(
                    "provision: unrecognized action: {action:?}"
                )));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
#[path = "provision_tests.rs"]
mod tests;
