use std::any::{Any, TypeId, type_name};

use flume::Sender;

pub(crate) type Update = (TypeId, Box<dyn Any + Send>);

/// Send-safe handle that publishes a new value for a registered state or compute.
///
/// Values are queued and applied by [`crate::StateCtx::sync_computes`] on the UI thread.
#[derive(Debug, Clone)]
pub struct Updater {
    send: Sender<Update>,
}

impl Updater {
    pub(crate) fn new(send: Sender<Update>) -> Self {
        Self { send }
    }

    pub fn set<T: Any + Send>(&self, value: T) {
        if self
            .send
            .send((TypeId::of::<T>(), Box::new(value)))
            .is_err()
        {
            log::warn!(
                "State context dropped before {} update arrived",
                type_name::<T>()
            );
        }
    }
}
