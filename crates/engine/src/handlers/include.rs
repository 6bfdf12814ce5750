// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `include`: a string path (absolute, or relative to the current base
//! path) naming a YAML file whose contents are recursively read and
//! additively merged into the enclosing configuration.

use crate::context::ZoneContext;
use zonys_config::{ConfigEvent, Handler};
use zonys_core::{merge_additive, Error, Result};

pub struct IncludeHandler;

impl Handler<ZoneContext> for IncludeHandler {
    fn field(&self) -> &'static str {
        "include"
    }

    fn before_configuration(&self, event: &mut ConfigEvent<ZoneContext>) -> Result<()> {
        let relative = event.options.as_str().ok_or_else(|| {
            Error::InvalidConfiguration("include: expected a string path".into())
        })?;
        let path = std::path::Path::new(relative);
        let resolved = if path.is_absolute() {
            path.to_path_buf()
        } else {
            event.base.join(path)
        };
        let contents = std::fs::read_to_string(&resolved).map_err(|e| {
            Error::InvalidConfiguration(format!("include {}: {e}", resolved.display()))
        })?;
        let mut loaded: zonys_core::Value = serde_yaml::from_str(&contents)?;

        let new_base = resolved
            .parent()
            .map(std::path::Path::to_path_buf)
            .unwrap_or_else(|| event.base.clone());
        event.manager.read(&mut loaded, &new_base)?;
        merge_additive(event.configuration, loaded);
        Ok(())
    }
}
