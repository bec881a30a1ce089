use std::any::TypeId;

use crate::{Dep, State, Updater};

/// `(state deps, compute deps)` read by a compute.
pub type ComputeDeps = (&'static [TypeId], &'static [TypeId]);

/// Derived value recomputed when one of its dependencies changes.
///
/// `compute` never mutates `self`: it publishes the next value with
/// `updater.set(...)`, which is applied on the next [`crate::StateCtx::sync_computes`].
/// A compute may also be a pure cache with a no-op `compute`, updated only by commands.
pub trait Compute: State {
    fn deps(&self) -> ComputeDeps;

    fn compute(&self, deps: Dep<'_>, updater: Updater);
}
