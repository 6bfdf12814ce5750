// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The built-in handlers, in the canonical registration order that,
//! combined with depth-first validation, produces the commit list's
//! execution order (see the workspace spec, §4.6).

mod base;
mod execute;
mod include;
mod jail;
mod mount;
mod name;
mod network;
mod provision;
mod temporary;
mod variable;

pub use base::BaseHandler;
pub use execute::ExecuteHandler;
pub use include::IncludeHandler;
pub use jail::JailHandler;
pub use mount::MountHandler;
pub use name::NameHandler;
pub use network::NetworkHandler;
pub use provision::ProvisionHandler;
pub use temporary::TemporaryHandler;
pub use variable::VariableHandler;

use crate::context::ZoneContext;
use std::sync::Arc;
use zonys_adapters::command::CommandRunner;
use zonys_config::Handler;
use zonys_core::FileSystemIdentifier;

/// Handlers bound against a zone's *local* spec — the fields that only make
/// sense at creation time, before a dataset or jail exist. Used by
/// [`crate::zone::Zone::create`]'s `before_create_zone`/`after_create_zone`
/// phases. `zone_root` is the zone store's dataset identifier — the `base`
/// handler needs it to resolve sibling zones by name/UUID.
pub fn creation_handlers(
    runner: Arc<dyn CommandRunner>,
    zone_root: FileSystemIdentifier,
) -> Vec<Arc<dyn Handler<ZoneContext>>> {
    vec![
        Arc::new(VariableHandler),
        Arc::new(IncludeHandler),
        Arc::new(BaseHandler::new(runner.clone(), zone_root)),
        Arc::new(NameHandler),
        Arc::new(ProvisionHandler::new(runner)),
    ]
}

/// Handlers bound against a zone's *merged* (inherited) spec — the fields
/// relevant once the dataset exists and the zone is being started or
/// stopped. `name`/`base`/`provision` are deliberately absent here: a
/// zone's lineage is only meaningful during creation, and re-binding `base`
/// against a merged spec that already carries an ancestor's own `base` key
/// would re-trigger dataset cloning on every start.
pub fn runtime_handlers(runner: Arc<dyn CommandRunner>) -> Vec<Arc<dyn Handler<ZoneContext>>> {
    vec![
        Arc::new(VariableHandler),
        Arc::new(IncludeHandler),
        Arc::new(MountHandler::new(runner.clone())),
        Arc::new(TemporaryHandler),
        Arc::new(NetworkHandler),
        Arc::new(ExecuteHandler::new(runner.clone())),
        Arc::new(JailHandler),
    ]
}
