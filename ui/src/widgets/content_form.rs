//! Content generation form.
//!
//! Shows the common inputs, then only the field group of the selected content type.
//! Required inputs carry a `*` marker taken from [`FieldVisibilityCompute`], which is the
//! same table the payload builder validates against.

use egui::{Button, ComboBox, Grid, Response, TextEdit, Ui};
use scribe_business::{
    ContentType, FieldId, FieldVisibilityCompute, FormInput, GenerateInput, GenerationCompute,
    TONES, submit_generation,
};
use scribe_states::StateCtx;

use crate::utils::colors::COLOR_ERROR;

/// Renders the form and handles the generate button.
pub fn content_form(state_ctx: &mut StateCtx, ui: &mut Ui) -> Response {
    let visibility = state_ctx
        .cached::<FieldVisibilityCompute>()
        .cloned()
        .unwrap_or_default();
    let generation = state_ctx
        .cached::<GenerationCompute>()
        .cloned()
        .unwrap_or_default();
    let validation_error = state_ctx
        .state::<GenerateInput>()
        .validation_error
        .as_ref()
        .map(ToString::to_string);

    let mut form = state_ctx.state::<FormInput>().clone();
    let mut should_submit = false;

    let response = ui
        .vertical(|ui| {
            Grid::new("common_fields")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(field_label("Content type", true));
                    ComboBox::from_id_salt("content_type")
                        .selected_text(
                            form.content_type
                                .map_or("Select a type", ContentType::label),
                        )
                        .show_ui(ui, |ui| {
                            for ct in ContentType::ALL {
                                ui.selectable_value(
                                    &mut form.content_type,
                                    Some(ct),
                                    ct.label(),
                                );
                            }
                        });
                    ui.end_row();

                    ui.label(field_label("Tone", true));
                    let selected_tone = if form.tone.is_empty() {
                        "Select a tone"
                    } else {
                        form.tone.as_str()
                    }
                    .to_owned();
                    ComboBox::from_id_salt("tone")
                        .selected_text(selected_tone)
                        .show_ui(ui, |ui| {
                            for tone in TONES {
                                ui.selectable_value(
                                    &mut form.tone,
                                    tone.to_owned(),
                                    capitalize(tone),
                                );
                            }
                        });
                    ui.end_row();

                    for field in visibility.visible_fields() {
                        let required = visibility.is_required(field);
                        let label = ui.label(field_label(field.label(), required));
                        ui.add(TextEdit::singleline(form.value_mut(field)).hint_text(hint(field)))
                            .labelled_by(label.id);
                        ui.end_row();
                    }
                });

            ui.add_space(8.0);
            let label = ui.label(field_label("Key points", true));
            ui.add(
                TextEdit::multiline(&mut form.points)
                    .desired_rows(4)
                    .hint_text("What should the text cover?"),
            )
            .labelled_by(label.id);

            if let Some(message) = &validation_error {
                ui.add_space(4.0);
                ui.colored_label(COLOR_ERROR, message);
            }

            ui.add_space(8.0);
            if ui
                .add_enabled(
                    !generation.is_submitting(),
                    Button::new(generation.generate_button_label()),
                )
                .clicked()
            {
                should_submit = true;
            }
        })
        .response;

    // Update state if values changed
    if *state_ctx.state::<FormInput>() != form {
        *state_ctx.state_mut::<FormInput>() = form;
    }

    if should_submit && let Err(err) = submit_generation(state_ctx) {
        log::debug!("Generate blocked by validation: {err}");
    }

    response
}

fn field_label(label: &str, required: bool) -> String {
    if required {
        format!("{label} *")
    } else {
        label.to_owned()
    }
}

fn hint(field: FieldId) -> &'static str {
    if field.is_numeric() { "optional" } else { "" }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}
