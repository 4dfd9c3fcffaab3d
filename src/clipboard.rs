//! Clipboard access and per-block copy feedback
//!
//! Copying a block writes its text to the system clipboard and marks that
//! block as "copied" for a short window. Each block keeps its own expiry, so
//! copying one block never changes the confirmation shown for another.
//! Clipboard failures are logged and swallowed.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use arboard::Clipboard;

use crate::core::{BlockKey, ClipboardError};

/// How long a copy confirmation stays visible
pub const DEFAULT_FEEDBACK: Duration = Duration::from_millis(2000);

/// Destination for copied text
pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard via `arboard`
///
/// The handle is opened lazily so headless environments only fail when a
/// copy is actually attempted.
#[derive(Default)]
pub struct SystemClipboard {
    clipboard: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.clipboard.is_none() {
            self.clipboard = Some(Clipboard::new().map_err(|e| ClipboardError(e.to_string()))?);
        }
        match self.clipboard.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text.to_string())
                .map_err(|e| ClipboardError(e.to_string())),
            None => Err(ClipboardError("clipboard not initialized".to_string())),
        }
    }
}

/// Transient "copied" confirmations keyed by block
#[derive(Debug, Clone)]
pub struct CopyFeedback {
    window: Duration,
    confirmed_until: HashMap<BlockKey, Instant>,
}

impl Default for CopyFeedback {
    fn default() -> Self {
        Self::new(DEFAULT_FEEDBACK)
    }
}

impl CopyFeedback {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            confirmed_until: HashMap::new(),
        }
    }

    /// Write `text` and confirm `key` on success
    ///
    /// Returns whether the copy succeeded.
    pub fn copy(
        &mut self,
        clipboard: &mut dyn ClipboardWriter,
        key: BlockKey,
        text: &str,
        now: Instant,
    ) -> bool {
        match clipboard.write_text(text) {
            Ok(()) => {
                tracing::debug!("Copied {} ({} chars)", key, text.chars().count());
                self.prune(now);
                self.confirmed_until.insert(key, now + self.window);
                true
            }
            Err(e) => {
                tracing::warn!("Copy of {} failed: {}", key, e);
                false
            }
        }
    }

    pub fn is_confirmed(&self, key: BlockKey, now: Instant) -> bool {
        self.confirmed_until
            .get(&key)
            .is_some_and(|until| now < *until)
    }

    /// Drop expired confirmations
    fn prune(&mut self, now: Instant) {
        self.confirmed_until.retain(|_, until| now < *until);
    }

    pub fn clear(&mut self) {
        self.confirmed_until.clear();
    }
}
