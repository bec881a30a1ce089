//! Clipboard write access for the Scribe UI.
//!
//! # Architecture
//!
//! - [`ClipboardWriter`]: async, Send-safe interface used by the copy command
//! - [`SystemClipboard`]: `arboard` on native, the async Clipboard API in the browser
//! - [`MemoryClipboard`]: recording writer for tests (`test-utils` feature)
//!
//! On WASM the browser promise is not `Send`, so the write runs on the JS thread via
//! `wasm_bindgen_futures::spawn_local` and the outcome comes back through a `flume`
//! channel.

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;

#[cfg(any(test, feature = "test-utils"))]
mod memory;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryClipboard;

/// Error types for clipboard writes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    /// No clipboard could be opened on this platform/session.
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),
    /// The clipboard refused the text.
    #[error("Clipboard write rejected: {0}")]
    Rejected(String),
    /// The write never reported back.
    #[error("Clipboard write cancelled")]
    Cancelled,
}

pub type ClipboardFuture = Pin<Box<dyn Future<Output = Result<(), ClipboardError>> + Send>>;

/// Writes text to a clipboard and reports success or failure asynchronously.
pub trait ClipboardWriter: Send + Sync + Debug {
    fn write_text(&self, text: String) -> ClipboardFuture;
}

/// The platform clipboard.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

#[cfg(not(target_arch = "wasm32"))]
impl ClipboardWriter for SystemClipboard {
    fn write_text(&self, text: String) -> ClipboardFuture {
        Box::pin(async move {
            log::debug!("Writing {} bytes to the system clipboard", text.len());
            let mut clipboard = arboard::Clipboard::new()
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            clipboard
                .set_text(text)
                .map_err(|e| ClipboardError::Rejected(e.to_string()))
        })
    }
}

#[cfg(target_arch = "wasm32")]
impl ClipboardWriter for SystemClipboard {
    fn write_text(&self, text: String) -> ClipboardFuture {
        let (tx, rx) = flume::bounded::<Result<(), ClipboardError>>(1);

        wasm_bindgen_futures::spawn_local(async move {
            let result = write_browser_clipboard(&text).await;
            // Receiver dropped means nobody waits for the outcome anymore.
            let _ = tx.send_async(result).await;
        });

        Box::pin(async move {
            rx.recv_async()
                .await
                .map_err(|_| ClipboardError::Cancelled)?
        })
    }
}

#[cfg(target_arch = "wasm32")]
async fn write_browser_clipboard(text: &str) -> Result<(), ClipboardError> {
    let window =
        web_sys::window().ok_or_else(|| ClipboardError::Unavailable("no window".to_owned()))?;
    log::debug!("Writing {} bytes to the browser clipboard", text.len());
    let promise = window.navigator().clipboard().write_text(text);
    wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| ClipboardError::Rejected(format!("{e:?}")))
}
