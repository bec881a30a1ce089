use std::time::Duration;

use egui_kittest::Harness;
use scribe_business::ClipboardState;
use scribe_clipboard::MemoryClipboard;
use scribe_ui::ScribeApp;
use scribe_ui::state::State;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// The full app over a mock backend and an in-memory clipboard.
pub struct TestCtx<'a> {
    pub mock_server: MockServer,
    pub clipboard: MemoryClipboard,
    harness: Harness<'a, ScribeApp>,
}

impl<'a> TestCtx<'a> {
    pub async fn new_app() -> Self {
        Self::new_app_with_clipboard(MemoryClipboard::new()).await
    }

    pub async fn new_app_with_clipboard(clipboard: MemoryClipboard) -> Self {
        let mock_server = MockServer::start().await;
        let state = State::test(mock_server.uri(), ClipboardState::new(clipboard.clone()));
        let app = ScribeApp::new(state);
        let harness = Harness::new_eframe(|_| app);

        Self {
            mock_server,
            clipboard,
            harness,
        }
    }

    pub fn harness_mut(&mut self) -> &mut Harness<'a, ScribeApp> {
        &mut self.harness
    }

    /// Answer `POST /api/generate` with `response`.
    pub async fn mock_generate(&self, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(response)
            .mount(&self.mock_server)
            .await;
    }

    /// Step frames, yielding to the runtime between them, until `done` holds.
    pub async fn step_until(&mut self, mut done: impl FnMut(&Harness<'a, ScribeApp>) -> bool) {
        for _ in 0..50 {
            self.harness.step();
            if done(&self.harness) {
                return;
            }
            yield_wait_for_network(20).await;
        }
        panic!("Condition not reached within 50 frames");
    }
}

/// Give spawned network tasks time to finish.
pub async fn yield_wait_for_network(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
