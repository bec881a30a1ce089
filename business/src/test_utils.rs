//! Test utilities for driving the generator against a mock backend.
//!
//! # Example
//!
//! ```ignore
//! let mut test_ctx = TestContext::new().await;
//! test_ctx.mock_generate_json(200, json!({"generated_text": "hi"})).await;
//!
//! test_ctx.fill_email();
//! submit_generation(&mut test_ctx.ctx).unwrap();
//! test_ctx.flush_and_wait().await;
//!
//! assert_eq!(test_ctx.generation().result_text(), "hi");
//! ```

#![cfg(all(test, not(target_arch = "wasm32")))]

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use scribe_clipboard::MemoryClipboard;
use scribe_states::{StateCtx, Time};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{
    BusinessConfig, ClipboardState, ContentType, FieldId, FormInput, GenerationCompute, register,
};

/// Mock server, a fully registered [`StateCtx`] pointed at it, and the clipboard it writes to.
pub struct TestContext {
    pub mock_server: MockServer,
    pub ctx: StateCtx,
    pub clipboard: MemoryClipboard,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_clipboard(MemoryClipboard::new()).await
    }

    pub async fn with_clipboard(clipboard: MemoryClipboard) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let mock_server = MockServer::start().await;
        let mut ctx = StateCtx::new();
        register(
            &mut ctx,
            BusinessConfig::new(mock_server.uri()),
            ClipboardState::new(clipboard.clone()),
        );
        ctx.update::<Time>(|time| *time = Time::at(epoch()));
        ctx.run_computed();
        ctx.sync_computes();

        Self {
            mock_server,
            ctx,
            clipboard,
        }
    }

    /// Replace the form with the email example used across the tests.
    pub fn fill_email(&mut self) {
        self.ctx.update::<FormInput>(|form| {
            *form = FormInput::new(ContentType::Email)
                .with(FieldId::Goal, "request raise")
                .with(FieldId::Recipient, "manager")
                .with_tone("friendly")
                .with_points("ask for a raise");
        });
    }

    pub fn generation(&self) -> &GenerationCompute {
        self.ctx.compute::<GenerationCompute>()
    }

    /// Move the frame clock to `ms` milliseconds after [`epoch`] and run one compute cycle.
    pub fn advance_to(&mut self, ms: i64) {
        self.ctx
            .update::<Time>(|time| *time = Time::at(epoch() + TimeDelta::milliseconds(ms)));
        self.ctx.run_computed();
        self.ctx.sync_computes();
    }

    /// Flush queued commands and wait until every spawned task has finished.
    pub async fn flush_and_wait(&mut self) {
        self.ctx.sync_computes();
        self.ctx.flush_commands();

        let timeout = Duration::from_secs(5);
        let start = std::time::Instant::now();

        while self.ctx.task_count() > 0 {
            assert!(
                start.elapsed() <= timeout,
                "Timed out waiting for pending tasks ({} still in JoinSet)",
                self.ctx.task_count()
            );

            if self.ctx.task_set_mut().join_next().await.is_some() {
                self.ctx.sync_computes();
            }
        }

        self.ctx.sync_computes();
        self.ctx.run_computed();
        self.ctx.sync_computes();
    }

    pub async fn mock_generate(&self, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(header("content-type", "application/json"))
            .respond_with(response)
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_generate_json(&self, status: u16, body: serde_json::Value) {
        self.mock_generate(ResponseTemplate::new(status).set_body_json(body))
            .await;
    }

    pub async fn mock_generate_text(&self, status: u16, body: &str) {
        self.mock_generate(
            ResponseTemplate::new(status).set_body_raw(body.to_owned(), "text/plain"),
        )
        .await;
    }
}

/// Fixed start of the test clock.
pub fn epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default()
}
