// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `variable`: merges its map into the manager's variable table, used by
//! template interpolation (`{name.sub.path}`) during `commit`.

use crate::context::ZoneContext;
use zonys_config::{ConfigEvent, Handler};
use zonys_core::Result;

pub struct VariableHandler;

impl Handler<ZoneContext> for VariableHandler {
    fn field(&self) -> &'static str {
        "variable"
    }

    fn on_attach(&self, event: &mut ConfigEvent<ZoneContext>) -> Result<()> {
        event.manager.merge_variables(event.options.clone());
        Ok(())
    }
}
