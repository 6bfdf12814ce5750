// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`Manager`]: owns the handler list, the commit list built by `read`, the
//! variable table used for template interpolation, and the rollback stack
//! built by `commit`.

use crate::handler::{CommitBinding, ConfigEvent, Handler, RollbackThunk};
use crate::phase::Phase;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info_span, warn};
use zonys_core::{interpolate_value, merge_additive, Result, Value, ValueExt};

/// One handler activation: the options subtree it bound, a snapshot of the
/// enclosing configuration at the time of binding, and the base path
/// relative paths inside `options` should resolve against.
pub struct Binding<Ctx> {
    pub handler: Arc<dyn Handler<Ctx>>,
    pub options: Value,
    pub configuration: Value,
    pub base: PathBuf,
}

impl<Ctx> Clone for Binding<Ctx> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
            options: self.options.clone(),
            configuration: self.configuration.clone(),
            base: self.base.clone(),
        }
    }
}

pub struct Manager<Ctx> {
    handlers: Vec<Arc<dyn Handler<Ctx>>>,
    attached: HashSet<&'static str>,
    commit_list: Vec<Binding<Ctx>>,
    variables: std::collections::HashMap<String, Value>,
    rollback: Vec<(Phase, Vec<RollbackThunk>)>,
}

impl<Ctx> Manager<Ctx> {
    pub fn new(handlers: Vec<Arc<dyn Handler<Ctx>>>) -> Self {
        Self {
            handlers,
            attached: HashSet::new(),
            commit_list: Vec::new(),
            variables: std::collections::HashMap::new(),
            rollback: Vec::new(),
        }
    }

    pub fn commit_list(&self) -> &[Binding<Ctx>] {
        &self.commit_list
    }

    pub fn variables(&self) -> &std::collections::HashMap<String, Value> {
        &self.variables
    }

    /// Merge `vars` into the variable table used for template interpolation
    /// (used by the `variable` handler's `on_attach`).
    pub fn merge_variables(&mut self, vars: Value) {
        let mut wrapper = zonys_core::value::empty_mapping();
        merge_additive(&mut wrapper, vars);
        for (key, value) in wrapper.as_string_map() {
            match self.variables.get_mut(&key) {
                Some(existing) => merge_additive(existing, value),
                None => {
                    self.variables.insert(key, value);
                }
            }
        }
    }

    /// Walk `configuration` against the fixed handler list (in registration
    /// order), recording one [`Binding`] per field present. Recurses via
    /// handler `before_configuration`/`after_configuration` callbacks to
    /// expand includes and inherited bases; such expansions additively
    /// merge their loaded subtree into `configuration` before the parent
    /// continues walking the remaining handlers.
    pub fn read(&mut self, configuration: &mut Value, base: &Path) -> Result<()> {
        let handlers = self.handlers.clone();
        for handler in &handlers {
            let field = handler.field();
            let Some(options) = configuration.as_string_map().get(field).cloned() else {
                continue;
            };

            let mut base_path = base.to_path_buf();
            if self.attached.insert(field) {
                let mut event = ConfigEvent {
                    manager: self,
                    options: &options,
                    configuration,
                    base: &mut base_path,
                };
                handler.on_attach(&mut event)?;
            }

            {
                let mut event = ConfigEvent {
                    manager: self,
                    options: &options,
                    configuration,
                    base: &mut base_path,
                };
                handler.before_configuration(&mut event)?;
            }

            // Snapshot configuration *after* before_configuration expansions
            // (include/base merges) so descendants see the expanded tree.
            self.commit_list.push(Binding {
                handler: handler.clone(),
                options: options.clone(),
                configuration: configuration.clone(),
                base: base_path.clone(),
            });

            {
                let mut event = ConfigEvent {
                    manager: self,
                    options: &options,
                    configuration,
                    base: &mut base_path,
                };
                handler.after_configuration(&mut event)?;
            }
        }
        Ok(())
    }

    /// Drive `phase` across every binding in commit-list order: interpolate
    /// templated options, normalize, then commit. A handler that returns a
    /// rollback thunk has it recorded under `phase`'s group.
    pub fn commit(&mut self, phase: Phase, ctx: &mut Ctx) -> Result<()> {
        let _span = info_span!("commit", phase = %phase).entered();
        let vars = self.variables.clone();
        let bindings = self.commit_list.clone();
        for binding in &bindings {
            let interpolated = interpolate_value(&binding.options, &vars);
            let normalized = binding.handler.on_normalize(&interpolated, ctx)?;
            let commit_binding = CommitBinding {
                options: &interpolated,
                configuration: &binding.configuration,
                base: &binding.base,
            };
            if let Some(thunk) =
                binding
                    .handler
                    .on_commit(phase, &commit_binding, ctx, &normalized)?
            {
                self.push_rollback(phase, thunk);
            }
        }
        Ok(())
    }

    fn push_rollback(&mut self, phase: Phase, thunk: RollbackThunk) {
        if let Some(group) = self.rollback.iter_mut().find(|(p, _)| *p == phase) {
            group.1.push(thunk);
        } else {
            self.rollback.push((phase, vec![thunk]));
        }
    }

    /// Drain every recorded rollback thunk: phase groups in reverse order of
    /// first appearance, thunks within a group in reverse append order. A
    /// thunk that fails aborts the drain and surfaces the error — rollback
    /// failures are fatal, not best-effort-and-continue.
    pub fn rollback(&mut self) -> Result<()> {
        while let Some((phase, mut thunks)) = self.rollback.pop() {
            let _span = info_span!("rollback", phase = %phase).entered();
            while let Some(thunk) = thunks.pop() {
                if let Err(err) = thunk() {
                    warn!(phase = %phase, error = %err, "rollback thunk failed");
                    return Err(err);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
