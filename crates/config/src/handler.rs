// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The [`Handler`] trait: the unit that binds a schema fragment (here, a
//! single top-level spec field) to phase callbacks.

use crate::manager::Manager;
use crate::phase::Phase;
use std::path::{Path, PathBuf};
use zonys_core::{Result, Value};

/// A closure capturing whatever a handler's `on_commit` created, run during
/// rollback to compensate for it. Takes no arguments — a handler captures
/// the resource (dataset handle, jail handle, mount handle, ...) it needs to
/// tear down directly in the closure rather than through a shared context,
/// since by the time rollback runs the context may have moved on to later
/// phases.
pub type RollbackThunk = Box<dyn FnOnce() -> Result<()> + Send>;

/// The configuration-expansion event passed to `on_attach`,
/// `before_configuration`, and `after_configuration`.
pub struct ConfigEvent<'a, Ctx> {
    pub manager: &'a mut Manager<Ctx>,
    pub options: &'a Value,
    pub configuration: &'a mut Value,
    pub base: &'a mut PathBuf,
}

/// The read-only view of a binding passed to `on_commit`, after template
/// interpolation has been applied to `options`.
pub struct CommitBinding<'a> {
    pub options: &'a Value,
    pub configuration: &'a Value,
    pub base: &'a Path,
}

/// A unit binding one top-level spec field to a set of optional lifecycle
/// callbacks. `Ctx` is the per-operation shared context threaded through
/// `on_commit` (e.g. the zone's in-progress file system handle, jail
/// handle, persistence sidecar); it is defined by whichever crate owns the
/// concrete resources (`zonys-engine`), not by this crate.
pub trait Handler<Ctx>: Send + Sync {
    /// The top-level spec field this handler binds, e.g. `"provision"`.
    /// Also used to track whether `on_attach` has already fired for a given
    /// manager.
    fn field(&self) -> &'static str;

    /// Fires once per (manager, handler) pair, the first time this
    /// handler's field is found during `read`.
    fn on_attach(&self, _event: &mut ConfigEvent<Ctx>) -> Result<()> {
        Ok(())
    }

    /// Fires before the binding is appended to the commit list. May recurse
    /// into `event.manager.read(...)` (e.g. to expand an `include`) and
    /// merge the result into `event.configuration`.
    fn before_configuration(&self, _event: &mut ConfigEvent<Ctx>) -> Result<()> {
        Ok(())
    }

    /// Fires after the binding is appended to the commit list.
    fn after_configuration(&self, _event: &mut ConfigEvent<Ctx>) -> Result<()> {
        Ok(())
    }

    /// Compute a normalized form of `options` (after template
    /// interpolation) ahead of `on_commit`. Handlers that don't need one
    /// may ignore this and re-parse `options` directly in `on_commit`.
    fn on_normalize(&self, options: &Value, _ctx: &Ctx) -> Result<Value> {
        Ok(options.clone())
    }

    /// Contribute to `phase`. Returning `Ok(Some(thunk))` registers `thunk`
    /// to run (in reverse order) if a later phase in the same transaction
    /// fails. A handler that has nothing to do for `phase` should return
    /// `Ok(None)` without side effects — equivalent to "doesn't declare
    /// `on_commit_<phase>`" in the source system.
    fn on_commit(
        &self,
        _phase: Phase,
        _binding: &CommitBinding,
        _ctx: &mut Ctx,
        _normalized: &Value,
    ) -> Result<Option<RollbackThunk>> {
        Ok(None)
    }
}
