//! Generated text (or error) with a copy button.

use egui::{Button, Color32, Label, Response, RichText, Ui};
use scribe_business::{CopyFeedbackCompute, CopyLabel, CopyResultCommand, GenerationCompute};
use scribe_states::StateCtx;

use crate::utils::colors::{COLOR_AMBER, COLOR_ERROR, COLOR_GREEN};

/// Renders the result area once a request has been submitted.
pub fn result_panel(state_ctx: &mut StateCtx, ui: &mut Ui) -> Option<Response> {
    let generation = state_ctx
        .cached::<GenerationCompute>()
        .cloned()
        .unwrap_or_default();
    if !generation.result_visible() {
        return None;
    }
    let copy_label = state_ctx
        .cached::<CopyFeedbackCompute>()
        .map(|feedback| feedback.label)
        .unwrap_or_default();

    let mut should_copy = false;
    let response = ui
        .group(|ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.strong("Result");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let text = RichText::new(copy_label.text());
                    let text = match copy_label_color(copy_label) {
                        Some(color) => text.color(color),
                        None => text,
                    };
                    if ui.add(Button::new(text)).clicked() {
                        should_copy = true;
                    }
                });
            });
            ui.separator();

            let text = RichText::new(generation.result_text());
            let text = match result_color(&generation) {
                Some(color) => text.color(color),
                None => text,
            };
            ui.add(Label::new(text).selectable(true).wrap());
        })
        .response;

    if should_copy {
        state_ctx.enqueue_command::<CopyResultCommand>();
    }

    Some(response)
}

/// Error results use the accent color; everything else keeps the theme color.
pub fn result_color(generation: &GenerationCompute) -> Option<Color32> {
    generation.is_error().then_some(COLOR_ERROR)
}

fn copy_label_color(label: CopyLabel) -> Option<Color32> {
    match label {
        CopyLabel::Copy => None,
        CopyLabel::Copied => Some(COLOR_GREEN),
        CopyLabel::Failed => Some(COLOR_AMBER),
    }
}
