//! Reactive state runtime shared by the business and UI crates.
//!
//! - [`State`]: inputs edited by widgets.
//! - [`Compute`]: derived values, or caches filled by commands.
//! - [`Command`]: explicit side effects, spawned with a [`CommandSnapshot`].
//! - [`Updater`]: the only way async work writes back into a [`StateCtx`].

mod basic_states;
mod command;
mod compute;
mod ctx;
mod dep;
mod state;
mod task;
mod updater;

pub use basic_states::Time;
pub use command::{Command, CommandFuture, CommandSnapshot};
pub use compute::{Compute, ComputeDeps};
pub use ctx::StateCtx;
pub use dep::Dep;
pub use state::{State, state_assign_impl};
pub use task::TaskId;
pub use updater::Updater;
