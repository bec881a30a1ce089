use std::any::{Any, type_name};
use std::fmt::Debug;

/// Input owned by the UI thread.
///
/// Widgets edit states in place through [`crate::StateCtx::state_mut`] or
/// [`crate::StateCtx::update`]; async work never touches them directly.
pub trait State: Any + Send + Debug {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// A cloned copy handed to commands. `None` keeps this value out of
    /// [`crate::CommandSnapshot`].
    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        None
    }

    /// Replace `self` with a value sent through an [`crate::Updater`].
    fn assign_box(&mut self, new_self: Box<dyn Any + Send>);
}

/// Shared body for [`State::assign_box`] and [`crate::Compute`] caches.
pub fn state_assign_impl<T: 'static>(target: &mut T, new_self: Box<dyn Any + Send>) {
    match new_self.downcast::<T>() {
        Ok(value) => *target = *value,
        Err(_) => log::error!(
            "Updater sent a value that is not a {}, update ignored",
            type_name::<T>()
        ),
    }
}
