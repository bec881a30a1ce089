use std::time::Duration;

use chrono::Utc;
use scribe_business::{CopyFeedbackCompute, GenerationCompute};
use scribe_states::Time;

use crate::{state::State, widgets};

/// Polling interval while a request or copy feedback is pending.
const PENDING_REPAINT: Duration = Duration::from_millis(100);

pub struct ScribeApp {
    pub state: State,
}

impl ScribeApp {
    /// Called once before the first frame.
    pub fn new(state: State) -> Self {
        Self { state }
    }

    fn has_pending_work(&self) -> bool {
        let ctx = &self.state.ctx;
        ctx.compute::<GenerationCompute>().is_submitting()
            || ctx.compute::<CopyFeedbackCompute>().is_active()
            || task_count(ctx) > 0
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn task_count(ctx: &scribe_states::StateCtx) -> usize {
    ctx.task_count()
}

#[cfg(target_arch = "wasm32")]
fn task_count(_ctx: &scribe_states::StateCtx) -> usize {
    0
}

impl eframe::App for ScribeApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state
            .ctx
            .update::<Time>(|time| *time.as_mut() = Utc::now());
        // Sync Compute for render
        self.state.ctx.sync_computes();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Scribe");
                ui.add_space(8.0);
                widgets::content_form(&mut self.state.ctx, ui);
                ui.add_space(16.0);
                widgets::result_panel(&mut self.state.ctx, ui);
            });
        });

        self.state.ctx.run_computed();
        self.state.ctx.flush_commands();

        if self.has_pending_work() {
            ctx.request_repaint_after(PENDING_REPAINT);
        }
    }
}
