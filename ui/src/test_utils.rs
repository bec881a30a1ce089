//! Harness helpers for widget tests.

use egui_kittest::Harness;
use scribe_business::ClipboardState;
use scribe_clipboard::MemoryClipboard;
use wiremock::MockServer;

use crate::state::State;

/// A kittest harness over [`State`], backed by a mock server and an in-memory clipboard.
///
/// Every step runs the same cycle as the app: sync, render, recompute, flush commands.
pub struct TestCtx<'a> {
    _mock_server: MockServer,
    pub clipboard: MemoryClipboard,
    harness: Harness<'a, State>,
}

impl<'a> TestCtx<'a> {
    pub async fn new(mut app: impl FnMut(&mut egui::Ui, &mut State) + 'a) -> Self {
        let mock_server = MockServer::start().await;
        let clipboard = MemoryClipboard::new();
        let state = State::test(mock_server.uri(), ClipboardState::new(clipboard.clone()));

        let harness = Harness::new_ui_state(
            move |ui, state: &mut State| {
                state.ctx.sync_computes();
                app(ui, state);
                state.ctx.run_computed();
                state.ctx.flush_commands();
            },
            state,
        );

        Self {
            _mock_server: mock_server,
            clipboard,
            harness,
        }
    }

    pub fn harness_mut(&mut self) -> &mut Harness<'a, State> {
        &mut self.harness
    }
}
