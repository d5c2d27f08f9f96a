//! Clipboard - In-process buffer behind Ctrl+V.
//!
//! Terminals deliver real pastes as bracketed paste events, which the input
//! layer routes straight to the focused field. This buffer covers the other
//! path: code that stages a code for Ctrl+V, as the demo's F6 key does.
//!
//! ```ignore
//! use spark_otp::state::clipboard;
//!
//! clipboard::copy("482913");
//! assert_eq!(clipboard::paste().as_deref(), Some("482913"));
//! ```

use std::cell::RefCell;

thread_local! {
    static CLIPBOARD_BUFFER: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Store text for a later paste. Empty text leaves the buffer untouched.
pub fn copy(text: &str) {
    if text.is_empty() {
        return;
    }
    CLIPBOARD_BUFFER.with(|buf| *buf.borrow_mut() = Some(text.to_string()));
}

/// Most recently copied text. Pasting does not consume it.
pub fn paste() -> Option<String> {
    CLIPBOARD_BUFFER.with(|buf| buf.borrow().clone())
}

pub fn clear() {
    CLIPBOARD_BUFFER.with(|buf| *buf.borrow_mut() = None);
}
