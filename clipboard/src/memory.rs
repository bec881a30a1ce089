use std::sync::{Arc, Mutex};

use crate::{ClipboardError, ClipboardFuture, ClipboardWriter};

/// In-memory clipboard that records every successful write.
///
/// Clones share the same record, so a test can keep one handle and give the other
/// to the code under test.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    written: Arc<Mutex<Vec<String>>>,
    fail_with: Option<ClipboardError>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose writes always fail with `error`.
    pub fn failing(error: ClipboardError) -> Self {
        Self {
            written: Arc::default(),
            fail_with: Some(error),
        }
    }

    pub fn written(&self) -> Vec<String> {
        self.written
            .lock()
            .map(|written| written.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<String> {
        self.written().pop()
    }
}

impl ClipboardWriter for MemoryClipboard {
    fn write_text(&self, text: String) -> ClipboardFuture {
        let written = Arc::clone(&self.written);
        let fail_with = self.fail_with.clone();

        Box::pin(async move {
            if let Some(err) = fail_with {
                return Err(err);
            }
            written
                .lock()
                .map_err(|e| ClipboardError::Rejected(e.to_string()))?
                .push(text);
            Ok(())
        })
    }
}
