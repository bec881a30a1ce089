#![cfg(not(target_arch = "wasm32"))]

use std::sync::Arc;
use std::time::Duration;

use scribe_clipboard::{ClipboardError, ClipboardFuture, ClipboardWriter, MemoryClipboard};
use serde_json::json;
use tokio::sync::Semaphore;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::test_utils::TestContext;
use crate::{
    BusinessConfig, COPY_FEEDBACK_MS, ClipboardState, ContentType, CopyFeedbackCompute,
    CopyLabel, CopyResultCommand, FieldId, FormInput, GenerateInput, GenerationStatus,
    submit_generation,
};

/// Clipboard whose writes only finish once the test adds a permit.
#[derive(Debug, Clone)]
struct GatedClipboard {
    gate: Arc<Semaphore>,
}

impl ClipboardWriter for GatedClipboard {
    fn write_text(&self, _text: String) -> ClipboardFuture {
        let gate = Arc::clone(&self.gate);
        Box::pin(async move {
            let _permit = gate.acquire().await.map_err(|_| ClipboardError::Cancelled)?;
            Ok(())
        })
    }
}

#[tokio::test]
async fn test_generate_success_renders_trimmed_text() {
    let mut test_ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_json(json!({
            "type": "email",
            "tone": "friendly",
            "points": "ask for a raise",
            "goal": "request raise",
            "recipient": "manager",
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"generated_text": "  Dear manager, ...\n"})),
        )
        .expect(1)
        .mount(&test_ctx.mock_server)
        .await;

    test_ctx.fill_email();
    submit_generation(&mut test_ctx.ctx).unwrap();
    test_ctx.flush_and_wait().await;

    let generation = test_ctx.generation();
    assert_eq!(
        generation.status,
        GenerationStatus::Success("Dear manager, ...".to_owned())
    );
    assert!(!generation.is_error());
    assert_eq!(generation.result_text(), "Dear manager, ...");
    assert_eq!(generation.generate_button_label(), "Generate");
}

#[tokio::test]
async fn test_generate_json_error_uses_error_field() {
    let mut test_ctx = TestContext::new().await;
    test_ctx
        .mock_generate_json(404, json!({"error": "rate limited"}))
        .await;

    test_ctx.fill_email();
    submit_generation(&mut test_ctx.ctx).unwrap();
    test_ctx.flush_and_wait().await;

    let generation = test_ctx.generation();
    assert!(generation.is_error());
    assert_eq!(generation.result_text(), "Error: rate limited");
    assert!(!generation.is_submitting());
}

#[tokio::test]
async fn test_generate_text_error_shows_status_line() {
    let mut test_ctx = TestContext::new().await;
    test_ctx
        .mock_generate_text(500, "Internal Server Error")
        .await;

    test_ctx.fill_email();
    submit_generation(&mut test_ctx.ctx).unwrap();
    test_ctx.flush_and_wait().await;

    assert_eq!(
        test_ctx.generation().result_text(),
        "Error: HTTP 500 Internal Server Error: Internal Server Error"
    );
    assert_eq!(test_ctx.generation().generate_button_label(), "Generate");
}

#[tokio::test]
async fn test_transport_failure_is_rendered_as_error() {
    let mut test_ctx = TestContext::new().await;
    // Nothing listens on the discard port.
    test_ctx.ctx.update::<BusinessConfig>(|config| {
        config.api_base_url = "http://127.0.0.1:9".to_owned();
    });

    test_ctx.fill_email();
    submit_generation(&mut test_ctx.ctx).unwrap();
    test_ctx.flush_and_wait().await;

    let generation = test_ctx.generation();
    assert!(generation.is_error());
    assert!(generation.result_text().starts_with("Error: "));
    assert_eq!(generation.generate_button_label(), "Generate");
}

#[tokio::test]
async fn test_json_error_with_broken_body_is_reported() {
    let mut test_ctx = TestContext::new().await;
    test_ctx
        .mock_generate(
            ResponseTemplate::new(502).set_body_raw("<html>Bad Gateway</html>", "application/json"),
        )
        .await;

    test_ctx.fill_email();
    submit_generation(&mut test_ctx.ctx).unwrap();
    test_ctx.flush_and_wait().await;

    assert_eq!(
        test_ctx.generation().status,
        GenerationStatus::Error("expected value at line 1 column 1".to_owned())
    );
    assert_eq!(test_ctx.generation().generate_button_label(), "Generate");
}

#[tokio::test]
async fn test_overlapping_submits_show_last_arriving_response() {
    let mut test_ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({"points": "first draft"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"generated_text": "slow answer"}))
                .set_delay(Duration::from_millis(400)),
        )
        .expect(1)
        .mount(&test_ctx.mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({"points": "second draft"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"generated_text": "fast answer"}))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&test_ctx.mock_server)
        .await;

    test_ctx.fill_email();
    test_ctx
        .ctx
        .update::<FormInput>(|form| form.points = "first draft".to_owned());
    submit_generation(&mut test_ctx.ctx).unwrap();
    test_ctx.ctx.flush_commands();

    test_ctx
        .ctx
        .update::<FormInput>(|form| form.points = "second draft".to_owned());
    submit_generation(&mut test_ctx.ctx).unwrap();
    test_ctx.flush_and_wait().await;

    // The first submit answers last, so its text replaces the second one.
    assert_eq!(
        test_ctx.generation().status,
        GenerationStatus::Success("slow answer".to_owned())
    );
}

#[tokio::test]
async fn test_invalid_form_never_hits_network() {
    let mut test_ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_ctx.mock_server)
        .await;

    test_ctx.ctx.update::<FormInput>(|form| {
        *form = FormInput::new(ContentType::Story)
            .with(FieldId::Genre, "noir")
            .with(FieldId::Setting, "  ")
            .with_tone("casual")
            .with_points("a twist");
    });
    let err = submit_generation(&mut test_ctx.ctx).unwrap_err();
    test_ctx.flush_and_wait().await;

    assert_eq!(err.missing_fields(), ["setting", "characters"]);
    assert_eq!(
        test_ctx.ctx.state::<GenerateInput>().validation_error,
        Some(err)
    );
    assert_eq!(test_ctx.generation().status, GenerationStatus::Idle);
}

#[tokio::test]
async fn test_essay_length_payload() {
    let mut test_ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_json(json!({
            "type": "essay",
            "topic": "tides",
            "length_words": 500,
            "tone": "formal",
            "points": "the moon",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"generated_text": "ok"})))
        .expect(1)
        .mount(&test_ctx.mock_server)
        .await;

    test_ctx.ctx.update::<FormInput>(|form| {
        *form = FormInput::new(ContentType::Essay)
            .with(FieldId::Topic, "tides")
            .with(FieldId::EssayLength, "500")
            .with_tone("formal")
            .with_points("the moon");
    });
    submit_generation(&mut test_ctx.ctx).unwrap();
    test_ctx.flush_and_wait().await;

    assert_eq!(test_ctx.generation().result_text(), "ok");
}

#[tokio::test]
async fn test_resubmit_after_error_succeeds() {
    let mut test_ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"error": "busy"})))
        .up_to_n_times(1)
        .mount(&test_ctx.mock_server)
        .await;
    test_ctx
        .mock_generate_json(200, json!({"generated_email": "Hello"}))
        .await;

    test_ctx.fill_email();
    submit_generation(&mut test_ctx.ctx).unwrap();
    test_ctx.flush_and_wait().await;
    assert_eq!(test_ctx.generation().result_text(), "Error: busy");

    submit_generation(&mut test_ctx.ctx).unwrap();
    test_ctx.ctx.sync_computes();
    assert!(test_ctx.generation().is_submitting());
    assert_eq!(test_ctx.generation().result_text(), "");

    test_ctx.flush_and_wait().await;
    assert_eq!(test_ctx.generation().result_text(), "Hello");
}

#[tokio::test]
async fn test_copy_shows_confirmation_then_reverts() {
    let mut test_ctx = TestContext::new().await;
    test_ctx
        .mock_generate_json(200, json!({"generated_text": "Dear manager"}))
        .await;
    test_ctx.fill_email();
    submit_generation(&mut test_ctx.ctx).unwrap();
    test_ctx.flush_and_wait().await;

    test_ctx.ctx.enqueue_command::<CopyResultCommand>();
    test_ctx.flush_and_wait().await;

    assert_eq!(test_ctx.clipboard.written(), vec!["Dear manager".to_owned()]);
    assert_eq!(
        test_ctx.ctx.compute::<CopyFeedbackCompute>().label,
        CopyLabel::Copied
    );

    test_ctx.advance_to(COPY_FEEDBACK_MS - 1);
    assert_eq!(
        test_ctx.ctx.compute::<CopyFeedbackCompute>().label,
        CopyLabel::Copied
    );

    test_ctx.advance_to(COPY_FEEDBACK_MS);
    assert_eq!(
        test_ctx.ctx.compute::<CopyFeedbackCompute>().label,
        CopyLabel::Copy
    );
}

#[tokio::test]
async fn test_copy_failure_shows_failed_then_reverts() {
    let clipboard = MemoryClipboard::failing(ClipboardError::Rejected("denied".to_owned()));
    let mut test_ctx = TestContext::with_clipboard(clipboard).await;
    test_ctx
        .mock_generate_json(404, json!({"error": "rate limited"}))
        .await;
    test_ctx.fill_email();
    submit_generation(&mut test_ctx.ctx).unwrap();
    test_ctx.flush_and_wait().await;

    test_ctx.ctx.enqueue_command::<CopyResultCommand>();
    test_ctx.flush_and_wait().await;

    assert!(test_ctx.clipboard.written().is_empty());
    assert_eq!(
        test_ctx.ctx.compute::<CopyFeedbackCompute>().label,
        CopyLabel::Failed
    );

    test_ctx.advance_to(COPY_FEEDBACK_MS);
    assert_eq!(
        test_ctx.ctx.compute::<CopyFeedbackCompute>().label,
        CopyLabel::Copy
    );
}

#[tokio::test]
async fn test_second_copy_restarts_feedback_timer() {
    let mut test_ctx = TestContext::new().await;
    test_ctx
        .mock_generate_json(200, json!({"generated_text": "text"}))
        .await;
    test_ctx.fill_email();
    submit_generation(&mut test_ctx.ctx).unwrap();
    test_ctx.flush_and_wait().await;

    test_ctx.ctx.enqueue_command::<CopyResultCommand>();
    test_ctx.flush_and_wait().await;

    test_ctx.advance_to(1500);
    test_ctx.ctx.enqueue_command::<CopyResultCommand>();
    test_ctx.flush_and_wait().await;

    test_ctx.advance_to(COPY_FEEDBACK_MS);
    assert_eq!(
        test_ctx.ctx.compute::<CopyFeedbackCompute>().label,
        CopyLabel::Copied
    );

    test_ctx.advance_to(1500 + COPY_FEEDBACK_MS);
    assert_eq!(
        test_ctx.ctx.compute::<CopyFeedbackCompute>().label,
        CopyLabel::Copy
    );
    assert_eq!(test_ctx.clipboard.written().len(), 2);
}

#[tokio::test]
async fn test_copy_with_empty_result_is_noop() {
    let mut test_ctx = TestContext::new().await;

    test_ctx.ctx.enqueue_command::<CopyResultCommand>();
    test_ctx.flush_and_wait().await;

    assert!(test_ctx.clipboard.written().is_empty());
    assert_eq!(
        *test_ctx.ctx.compute::<CopyFeedbackCompute>(),
        CopyFeedbackCompute::default()
    );
}

#[tokio::test]
async fn test_slow_copy_keeps_confirmation_for_full_delay() {
    let mut test_ctx = TestContext::new().await;
    test_ctx
        .mock_generate_json(200, json!({"generated_text": "Dear manager"}))
        .await;
    test_ctx.fill_email();
    submit_generation(&mut test_ctx.ctx).unwrap();
    test_ctx.flush_and_wait().await;

    let gate = Arc::new(Semaphore::new(0));
    test_ctx.ctx.update::<ClipboardState>(|clipboard| {
        *clipboard = ClipboardState::new(GatedClipboard {
            gate: Arc::clone(&gate),
        });
    });
    test_ctx.ctx.enqueue_command::<CopyResultCommand>();
    test_ctx.ctx.flush_commands();

    // The write is still pending while the clock passes the feedback delay.
    test_ctx.advance_to(2500);
    assert_eq!(
        test_ctx.ctx.compute::<CopyFeedbackCompute>().label,
        CopyLabel::Copy
    );

    gate.add_permits(1);
    test_ctx.flush_and_wait().await;
    assert_eq!(
        test_ctx.ctx.compute::<CopyFeedbackCompute>().label,
        CopyLabel::Copied
    );

    test_ctx.advance_to(2516);
    assert_eq!(
        test_ctx.ctx.compute::<CopyFeedbackCompute>().label,
        CopyLabel::Copied
    );

    test_ctx.advance_to(2500 + COPY_FEEDBACK_MS - 1);
    assert_eq!(
        test_ctx.ctx.compute::<CopyFeedbackCompute>().label,
        CopyLabel::Copied
    );

    test_ctx.advance_to(2500 + COPY_FEEDBACK_MS);
    assert_eq!(
        test_ctx.ctx.compute::<CopyFeedbackCompute>().label,
        CopyLabel::Copy
    );
}
