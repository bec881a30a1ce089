use scribe_business::{BusinessConfig, ClipboardState, register};
use scribe_states::StateCtx;

/// The main application state.
pub struct State {
    /// The state context for business logic.
    pub ctx: StateCtx,
}

impl Default for State {
    fn default() -> Self {
        Self::with(BusinessConfig::default(), ClipboardState::default())
    }
}

impl State {
    pub fn with(config: BusinessConfig, clipboard: ClipboardState) -> Self {
        let mut ctx = StateCtx::new();
        register(&mut ctx, config, clipboard);
        Self { ctx }
    }

    /// State pointed at a mock backend, writing to the given clipboard.
    pub fn test(base_url: String, clipboard: ClipboardState) -> Self {
        Self::with(BusinessConfig::new(base_url), clipboard)
    }
}
