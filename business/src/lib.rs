//! Form, request and clipboard logic of the Scribe content generator.
//!
//! Everything here is expressed as states, computes and commands for
//! [`scribe_states::StateCtx`]; the UI crate only renders them and forwards events.
//!
//! - [`FieldVisibilityCompute`]: which field group is shown and which fields are required
//! - [`build_payload`]: form values to a validated [`GenerateRequest`]
//! - [`submit_generation`] / [`GenerateCommand`]: the request lifecycle
//! - [`CopyResultCommand`] / [`CopyFeedbackCompute`]: copy button feedback

mod config;
mod content_type;
mod copy;
mod form;
mod generate;
pub mod http;
mod payload;
mod visibility;

#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod tests;

pub use config::BusinessConfig;
pub use content_type::{ContentType, FieldId};
pub use copy::{COPY_FEEDBACK_MS, ClipboardState, CopyFeedbackCompute, CopyLabel, CopyResultCommand};
pub use form::{FormInput, TONES};
pub use generate::{
    ERROR_BODY_PREVIEW_CHARS, GenerateCommand, GenerateError, GenerateInput, GenerationCompute,
    GenerationStatus, interpret_response, submit_generation,
};
pub use payload::{ContentDetails, GenerateRequest, ValidationError, build_payload};
pub use visibility::FieldVisibilityCompute;

use scribe_states::{StateCtx, Time};

/// Register every state, compute and command the generator uses.
///
/// Computes are recorded after the states they read.
pub fn register(ctx: &mut StateCtx, config: BusinessConfig, clipboard: ClipboardState) {
    ctx.add_state(Time::default());
    ctx.add_state(config);
    ctx.add_state(FormInput::new(ContentType::Email));
    ctx.add_state(GenerateInput::default());
    ctx.add_state(clipboard);

    ctx.record_compute(FieldVisibilityCompute::default());
    ctx.record_compute(GenerationCompute::default());
    ctx.record_compute(CopyFeedbackCompute::default());

    ctx.record_command(GenerateCommand);
    ctx.record_command(CopyResultCommand);
}
