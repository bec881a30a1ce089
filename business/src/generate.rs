//! Generate request lifecycle.
//!
//! `Idle -> Submitting -> Success | Error`, and a terminal state goes back to
//! `Submitting` on the next submit.
//!
//! - [`submit_generation`] validates the form. On success it stores the payload in
//!   [`GenerateInput`], flips [`GenerationCompute`] to `Submitting` and queues
//!   [`GenerateCommand`]. On failure it only records the [`ValidationError`].
//! - [`GenerateCommand`] posts the payload and writes the terminal status back through
//!   the `Updater`.
//!
//! In-flight requests are never cancelled by a new submit. Each command writes its own
//! outcome when it finishes, so the response that arrives last is the one displayed.

use std::any::{Any, TypeId};

use log::{error, info, warn};
use scribe_states::{
    Command, CommandFuture, CommandSnapshot, Compute, ComputeDeps, Dep, State, StateCtx, Updater,
    state_assign_impl,
};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::http::{Client, HttpError, Response};
use crate::{BusinessConfig, FormInput, GenerateRequest, ValidationError, build_payload};

/// Longest slice of a non-JSON error body shown to the user, in characters.
pub const ERROR_BODY_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GenerationStatus {
    #[default]
    Idle,
    Submitting,
    /// Trimmed generated text.
    Success(String),
    /// Message shown after the `Error: ` prefix.
    Error(String),
}

/// Latest generate status. Only [`GenerateCommand`] and [`submit_generation`] write it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationCompute {
    pub status: GenerationStatus,
}

impl GenerationCompute {
    pub fn new(status: GenerationStatus) -> Self {
        Self { status }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.status, GenerationStatus::Submitting)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.status, GenerationStatus::Error(_))
    }

    /// The result area stays hidden until the first submit.
    pub fn result_visible(&self) -> bool {
        !matches!(self.status, GenerationStatus::Idle)
    }

    /// Text rendered in the result area. Empty while idle or submitting.
    pub fn result_text(&self) -> String {
        match &self.status {
            GenerationStatus::Success(text) => text.clone(),
            GenerationStatus::Error(message) => format!("Error: {message}"),
            GenerationStatus::Idle | GenerationStatus::Submitting => String::new(),
        }
    }

    pub fn generate_button_label(&self) -> &'static str {
        if self.is_submitting() {
            "Generating..."
        } else {
            "Generate"
        }
    }
}

impl Compute for GenerationCompute {
    fn deps(&self) -> ComputeDeps {
        const STATE_IDS: [TypeId; 0] = [];
        const COMPUTE_IDS: [TypeId; 0] = [];
        (&STATE_IDS, &COMPUTE_IDS)
    }

    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {
        // Written by GenerateCommand only.
    }
}

impl State for GenerationCompute {
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

/// Input of [`GenerateCommand`], plus the outcome of the last validation.
#[derive(Debug, Clone, Default)]
pub struct GenerateInput {
    /// Payload of the latest accepted submit. `None` means nothing to send.
    pub request: Option<GenerateRequest>,
    pub validation_error: Option<ValidationError>,
}

impl State for GenerateInput {
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

/// Handle a submit of the form.
///
/// A validation failure is kept in [`GenerateInput::validation_error`] for the form to
/// show; the lifecycle status is untouched and no request is queued.
pub fn submit_generation(ctx: &mut StateCtx) -> Result<(), ValidationError> {
    match build_payload(ctx.state::<FormInput>()) {
        Ok(request) => {
            info!("Submitting {} generation", request.content_type().as_str());
            ctx.update::<GenerateInput>(|input| {
                input.request = Some(request);
                input.validation_error = None;
            });
            ctx.updater()
                .set(GenerationCompute::new(GenerationStatus::Submitting));
            ctx.enqueue_command::<GenerateCommand>();
            Ok(())
        }
        Err(err) => {
            warn!("Generate form rejected: {err}");
            ctx.update::<GenerateInput>(|input| input.validation_error = Some(err.clone()));
            Err(err)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    /// Non-2xx answer.
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error(transparent)]
    Transport(#[from] HttpError),
    /// The body announced JSON but could not be parsed.
    #[error("{0}")]
    Malformed(String),
}

/// Turn a generate response into the trimmed result text.
pub fn interpret_response(response: &Response) -> Result<String, GenerateError> {
    if !response.is_success() {
        return Err(GenerateError::Http {
            status: response.status,
            message: error_message(response)?,
        });
    }

    if !response.is_json() {
        return Ok(response.text().trim().to_owned());
    }

    let body: Value = response
        .json()
        .map_err(|e| GenerateError::Malformed(e.to_string()))?;
    let text = ["generated_text", "generated_email"]
        .into_iter()
        .filter_map(|key| body.get(key).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .unwrap_or_default();
    Ok(text.trim().to_owned())
}

fn error_message(response: &Response) -> Result<String, GenerateError> {
    if response.is_json() {
        let body: Value = response
            .json()
            .map_err(|e| GenerateError::Malformed(e.to_string()))?;
        return Ok(body
            .get("error")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .map_or_else(|| format!("HTTP {}", response.status), str::to_owned));
    }

    let preview: String = response
        .text()
        .chars()
        .take(ERROR_BODY_PREVIEW_CHARS)
        .collect();
    Ok(format!(
        "HTTP {} {}: {preview}",
        response.status, response.status_text
    ))
}

/// Post the payload in [`GenerateInput`] and publish the terminal status.
#[derive(Debug, Default)]
pub struct GenerateCommand;

impl Command for GenerateCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let input = snap.state::<GenerateInput>().clone();
        let url = snap.state::<BusinessConfig>().generate_url();

        Box::pin(async move {
            let Some(request) = input.request else {
                info!("GenerateCommand: no accepted payload, skipping");
                return;
            };

            updater.set(GenerationCompute::new(GenerationStatus::Submitting));
            info!("GenerateCommand: POST {url}");

            let outcome = match Client::post(&url).json(&request) {
                Ok(builder) => builder
                    .send()
                    .await
                    .map_err(GenerateError::from)
                    .and_then(|response| interpret_response(&response)),
                Err(err) => Err(GenerateError::Malformed(err.to_string())),
            };

            let status = match outcome {
                Ok(text) => {
                    info!("GenerateCommand: received {} chars", text.len());
                    GenerationStatus::Success(text)
                }
                Err(err) => {
                    error!("GenerateCommand failed: {err:?}");
                    GenerationStatus::Error(err.to_string())
                }
            };
            updater.set(GenerationCompute::new(status));
        })
    }
}
