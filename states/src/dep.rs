use std::any::{TypeId, type_name};
use std::collections::BTreeMap;

use crate::State;

/// Read-only view of the registered states, passed to [`crate::Compute::compute`].
pub struct Dep<'a> {
    states: &'a BTreeMap<TypeId, Box<dyn State>>,
}

impl<'a> Dep<'a> {
    pub(crate) fn new(states: &'a BTreeMap<TypeId, Box<dyn State>>) -> Self {
        Self { states }
    }

    /// # Panics
    /// Panics if `T` was never registered with `add_state`.
    pub fn get_state_ref<T: State>(&self) -> &'a T {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|state| state.as_any().downcast_ref::<T>())
            .unwrap_or_else(|| panic!("State {} is not registered", type_name::<T>()))
    }
}
