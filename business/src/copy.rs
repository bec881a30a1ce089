//! Copy-to-clipboard with timed label feedback.

use std::any::{Any, TypeId};
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use log::{info, warn};
use scribe_clipboard::{ClipboardWriter, SystemClipboard};
use scribe_states::{
    Command, CommandFuture, CommandSnapshot, Compute, ComputeDeps, Dep, State, Time, Updater,
    state_assign_impl,
};
use tokio_util::sync::CancellationToken;

use crate::GenerationCompute;

/// How long "Copied!" / "Failed!" stays on the copy button.
pub const COPY_FEEDBACK_MS: i64 = 2000;

/// Clipboard used by [`CopyResultCommand`].
#[derive(Debug, Clone)]
pub struct ClipboardState {
    pub writer: Arc<dyn ClipboardWriter>,
}

impl ClipboardState {
    pub fn new(writer: impl ClipboardWriter + 'static) -> Self {
        Self {
            writer: Arc::new(writer),
        }
    }
}

impl Default for ClipboardState {
    fn default() -> Self {
        Self::new(SystemClipboard)
    }
}

impl State for ClipboardState {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CopyLabel {
    #[default]
    Copy,
    Copied,
    Failed,
}

impl CopyLabel {
    pub fn text(self) -> &'static str {
        match self {
            Self::Copy => "Copy",
            Self::Copied => "Copied!",
            Self::Failed => "Failed!",
        }
    }
}

/// Copy button label. Falls back to [`CopyLabel::Copy`] once [`Time`] is
/// [`COPY_FEEDBACK_MS`] past `shown_at`.
///
/// [`CopyResultCommand`] publishes its outcome with `shown_at: None`; the next compute
/// stamps it with the frame time it landed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyFeedbackCompute {
    pub label: CopyLabel,
    pub shown_at: Option<DateTime<Utc>>,
}

impl CopyFeedbackCompute {
    /// Outcome of a finished write, not yet stamped.
    pub fn landed(label: CopyLabel) -> Self {
        Self {
            label,
            shown_at: None,
        }
    }

    pub fn shown(label: CopyLabel, at: DateTime<Utc>) -> Self {
        Self {
            label,
            shown_at: Some(at),
        }
    }

    pub fn expired_at(&self, now: DateTime<Utc>) -> bool {
        self.shown_at
            .is_some_and(|shown_at| now - shown_at >= TimeDelta::milliseconds(COPY_FEEDBACK_MS))
    }

    pub fn is_active(&self) -> bool {
        self.label != CopyLabel::Copy
    }
}

impl Compute for CopyFeedbackCompute {
    fn deps(&self) -> ComputeDeps {
        const STATE_IDS: [TypeId; 1] = [TypeId::of::<Time>()];
        // rerun when a command publishes a new outcome
        const COMPUTE_IDS: [TypeId; 1] = [TypeId::of::<CopyFeedbackCompute>()];
        (&STATE_IDS, &COMPUTE_IDS)
    }

    fn compute(&self, deps: Dep<'_>, updater: Updater) {
        let now = *deps.get_state_ref::<Time>().as_ref();
        if self.is_active() && self.shown_at.is_none() {
            updater.set(Self::shown(self.label, now));
        } else if self.expired_at(now) {
            updater.set(Self::default());
        }
    }
}

impl State for CopyFeedbackCompute {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

/// Copy the displayed result. Does nothing while the result area is empty.
///
/// The feedback is timed from the frame the write outcome lands in, so a slow write
/// still shows its label for the full delay. A second copy restarts the timer.
#[derive(Debug, Default)]
pub struct CopyResultCommand;

impl Command for CopyResultCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let text = snap.compute::<GenerationCompute>().result_text();
        let writer = Arc::clone(&snap.state::<ClipboardState>().writer);

        Box::pin(async move {
            if text.is_empty() {
                return;
            }

            let label = match writer.write_text(text).await {
                Ok(()) => {
                    info!("Copied result to clipboard");
                    CopyLabel::Copied
                }
                Err(err) => {
                    warn!("Failed to copy result: {err}");
                    CopyLabel::Failed
                }
            };
            updater.set(CopyFeedbackCompute::landed(label));
        })
    }
}
