//! Input Module - Event conversion and polling
//!
//! Bridges crossterm's event system with the keyboard module.
//! Bracketed paste arrives as a single [`InputEvent::Paste`] so a pasted code
//! reaches the focused field as one edit instead of N keystrokes.
//!
//! # API
//!
//! - `convert_key_event` - Convert crossterm KeyEvent to our KeyboardEvent
//! - `convert_event` - Convert any crossterm Event to an InputEvent
//! - `poll_event` - Non-blocking event check with timeout
//! - `read_event` - Blocking event read
//! - `route_event` - Dispatch event to appropriate handler
//! - `enable_paste` / `disable_paste` - Control bracketed paste
//!
//! # Example
//!
//! ```ignore
//! use spark_otp::state::input::{poll_event, route_event};
//! use std::time::Duration;
//!
//! loop {
//!     if let Ok(Some(event)) = poll_event(Duration::from_millis(16)) {
//!         route_event(event);
//!     }
//! }
//! ```

use crossterm::event::{
    poll, read, DisableBracketedPaste, EnableBracketedPaste, Event as CrosstermEvent,
    KeyCode, KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::execute;
use std::io::stdout;
use std::time::Duration;

use super::keyboard::{self, KeyState, KeyboardEvent, Modifiers};

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// Unified event type
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(KeyboardEvent),
    /// Bracketed paste payload
    Paste(String),
    /// Terminal resize event (new width, height)
    Resize(u16, u16),
    /// Focus changes, mouse, unmapped keys
    None,
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert crossterm KeyEvent to our KeyboardEvent
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        // Terminals report Shift+Tab as BackTab
        KeyCode::BackTab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => String::new(),
    };

    let state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };

    let mut modifiers = convert_modifiers(event.modifiers);
    if event.code == KeyCode::BackTab {
        modifiers.shift = true;
    }

    KeyboardEvent {
        key,
        modifiers,
        state,
    }
}

fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
        meta: mods.contains(KeyModifiers::META) || mods.contains(KeyModifiers::SUPER),
    }
}

/// Convert a crossterm event into an InputEvent.
pub fn convert_event(event: CrosstermEvent) -> InputEvent {
    match event {
        CrosstermEvent::Key(key) => {
            let converted = convert_key_event(key);
            if converted.key.is_empty() {
                InputEvent::None
            } else {
                InputEvent::Key(converted)
            }
        }
        CrosstermEvent::Paste(text) => InputEvent::Paste(text),
        CrosstermEvent::Resize(w, h) => InputEvent::Resize(w, h),
        _ => InputEvent::None,
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(read_event()?))
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking).
pub fn read_event() -> std::io::Result<InputEvent> {
    Ok(convert_event(read()?))
}

// =============================================================================
// EVENT ROUTING
// =============================================================================

/// Route an event to the appropriate handler.
/// Returns true if any handler consumed the event.
pub fn route_event(event: InputEvent) -> bool {
    match event {
        InputEvent::Key(key) => keyboard::dispatch(key),
        InputEvent::Paste(text) => keyboard::dispatch_paste(&text),
        InputEvent::Resize(w, h) => {
            crate::pipeline::set_terminal_size(w, h);
            false
        }
        InputEvent::None => false,
    }
}

// =============================================================================
// BRACKETED PASTE
// =============================================================================

pub fn enable_paste() -> std::io::Result<()> {
    execute!(stdout(), EnableBracketedPaste)
}

pub fn disable_paste() -> std::io::Result<()> {
    execute!(stdout(), DisableBracketedPaste)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> CrosstermKeyEvent {
        CrosstermKeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_convert_key_digit() {
        let event = convert_key_event(key(KeyCode::Char('7'), KeyModifiers::empty()));
        assert_eq!(event.key, "7");
        assert_eq!(event.state, KeyState::Press);
        assert!(!event.modifiers.ctrl);
    }

    #[test]
    fn test_convert_key_editing() {
        let keys = [
            (KeyCode::Enter, "Enter"),
            (KeyCode::Backspace, "Backspace"),
            (KeyCode::Delete, "Delete"),
            (KeyCode::Tab, "Tab"),
            (KeyCode::Esc, "Escape"),
            (KeyCode::Home, "Home"),
            (KeyCode::End, "End"),
        ];

        for (code, expected) in keys {
            let event = convert_key_event(key(code, KeyModifiers::empty()));
            assert_eq!(event.key, expected);
        }
    }

    #[test]
    fn test_back_tab_is_shift_tab() {
        let event = convert_key_event(key(KeyCode::BackTab, KeyModifiers::empty()));
        assert_eq!(event.key, "Tab");
        assert!(event.modifiers.shift);
    }

    #[test]
    fn test_convert_key_with_ctrl() {
        let event = convert_key_event(key(KeyCode::Char('v'), KeyModifiers::CONTROL));
        assert_eq!(event.key, "v");
        assert!(event.modifiers.ctrl);
        assert!(!event.modifiers.alt);
    }

    #[test]
    fn test_convert_key_states() {
        let states = [
            (KeyEventKind::Press, KeyState::Press),
            (KeyEventKind::Repeat, KeyState::Repeat),
            (KeyEventKind::Release, KeyState::Release),
        ];

        for (kind, expected) in states {
            let mut raw = key(KeyCode::Char('1'), KeyModifiers::empty());
            raw.kind = kind;
            assert_eq!(convert_key_event(raw).state, expected);
        }
    }

    #[test]
    fn test_convert_paste_and_resize() {
        assert_eq!(
            convert_event(CrosstermEvent::Paste("123 456".into())),
            InputEvent::Paste("123 456".into())
        );
        assert_eq!(
            convert_event(CrosstermEvent::Resize(80, 24)),
            InputEvent::Resize(80, 24)
        );
        assert_eq!(convert_event(CrosstermEvent::FocusLost), InputEvent::None);
    }

    #[test]
    fn test_unmapped_key_is_none() {
        let event = convert_event(CrosstermEvent::Key(key(KeyCode::CapsLock, KeyModifiers::empty())));
        assert_eq!(event, InputEvent::None);
    }
}
