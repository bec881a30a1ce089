use std::any::{Any, TypeId, type_name};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::{Compute, State, Updater};

pub type CommandFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Manual-only side effect (network, clipboard, ...).
///
/// Commands never run implicitly. They are queued with
/// [`crate::StateCtx::enqueue_command`] and spawned by
/// [`crate::StateCtx::flush_commands`] with a snapshot of the states taken at flush time.
/// Results flow back through the [`Updater`].
pub trait Command: Any + Send + Sync + Debug {
    fn run(&self, snap: CommandSnapshot, updater: Updater, cancel: CancellationToken)
    -> CommandFuture;
}

/// Owned copies of every state and compute that opted into snapshots.
#[derive(Default)]
pub struct CommandSnapshot {
    inner: BTreeMap<TypeId, Box<dyn Any + Send>>,
}

impl CommandSnapshot {
    pub(crate) fn insert(&mut self, id: TypeId, value: Box<dyn Any + Send>) {
        self.inner.insert(id, value);
    }

    fn get<T: Any>(&self) -> Option<&T> {
        self.inner
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    /// # Panics
    /// Panics if `T` is not registered or returns `None` from [`State::snapshot`].
    pub fn state<T: State>(&self) -> &T {
        self.get::<T>()
            .unwrap_or_else(|| panic!("State snapshot for {} is missing", type_name::<T>()))
    }

    /// # Panics
    /// Panics if `T` is not registered or returns `None` from [`State::snapshot`].
    pub fn compute<T: Compute>(&self) -> &T {
        self.get::<T>()
            .unwrap_or_else(|| panic!("Compute snapshot for {} is missing", type_name::<T>()))
    }
}
