//! Keyboard Module - Keyboard/paste events, handler registry, soft keyboard
//!
//! State and handler registry for keyboard and paste events.
//! Does NOT own stdin (that is the input module).
//!
//! # API
//!
//! - `on(handler)` - Subscribe to all keyboard events
//! - `on_key(key, fn)` - Subscribe to a specific key
//! - `on_focused(i, fn)` - Subscribe when component i has focus
//! - `on_paste_focused(i, fn)` - Receive pasted text when component i has focus
//! - [`SoftKeyboard`] - show/hide contract for the on-screen keyboard
//!
//! # Example
//!
//! ```ignore
//! use spark_otp::state::keyboard;
//!
//! let cleanup = keyboard::on_focused(component_index, |event| {
//!     println!("Focused component got: {}", event.key);
//!     false
//! });
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use spark_signals::{signal, Signal};
use tracing::trace;

// =============================================================================
// TYPES
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key that was pressed (e.g., "7", "Enter", "Backspace")
    pub key: String,
    pub modifiers: Modifiers,
    pub state: KeyState,
}

impl KeyboardEvent {
    /// Create a simple key press event
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            state: KeyState::Press,
        }
    }

    /// Create a key press with modifiers
    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            state: KeyState::Press,
        }
    }

    /// Repeats count as presses for text entry.
    pub fn is_press(&self) -> bool {
        matches!(self.state, KeyState::Press | KeyState::Repeat)
    }
}

/// Handler for keyboard events. Return true to consume the event.
pub type KeyHandler = Rc<dyn Fn(&KeyboardEvent) -> bool>;

/// Handler for a specific key. Return true to consume the event.
pub type KeySpecificHandler = Rc<dyn Fn() -> bool>;

/// Handler for pasted text. Return true to consume the paste.
pub type PasteHandler = Rc<dyn Fn(&str) -> bool>;

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

struct HandlerRegistry {
    global_handlers: Vec<(usize, KeyHandler)>,
    key_handlers: HashMap<String, Vec<(usize, KeySpecificHandler)>>,
    focused_handlers: HashMap<usize, Vec<(usize, KeyHandler)>>,
    paste_handlers: HashMap<usize, Vec<(usize, PasteHandler)>>,
    next_id: usize,
}

impl HandlerRegistry {
    fn new() -> Self {
        Self {
            global_handlers: Vec::new(),
            key_handlers: HashMap::new(),
            focused_handlers: HashMap::new(),
            paste_handlers: HashMap::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

thread_local! {
    static REGISTRY: RefCell<HandlerRegistry> = RefCell::new(HandlerRegistry::new());
}

// =============================================================================
// EVENT DISPATCH
// =============================================================================

/// Dispatch a keyboard event.
///
/// The focused component's handlers run first, then key-specific handlers,
/// then global handlers. Returns true if any handler consumed the event.
///
/// Handlers run against a snapshot of the registry, so a handler may
/// register or unregister handlers while the event is being dispatched.
pub fn dispatch(event: KeyboardEvent) -> bool {
    if !event.is_press() {
        return false;
    }

    let focused = super::focus::get_focused_index();
    dispatch_focused(focused, &event) || dispatch_to_handlers(&event)
}

/// Dispatch to key-specific and global handlers only (not focused).
pub fn dispatch_to_handlers(event: &KeyboardEvent) -> bool {
    let key_handlers: Vec<KeySpecificHandler> = REGISTRY.with(|reg| {
        reg.borrow()
            .key_handlers
            .get(&event.key)
            .map(|handlers| handlers.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default()
    });
    if key_handlers.iter().any(|handler| handler()) {
        return true;
    }

    let globals: Vec<KeyHandler> = REGISTRY.with(|reg| {
        reg.borrow().global_handlers.iter().map(|(_, h)| h.clone()).collect()
    });
    globals.iter().any(|handler| handler(event))
}

/// Dispatch to focused component handlers.
/// Returns true if consumed.
pub fn dispatch_focused(focused_index: i32, event: &KeyboardEvent) -> bool {
    if focused_index < 0 || !event.is_press() {
        return false;
    }

    let handlers: Vec<KeyHandler> = REGISTRY.with(|reg| {
        reg.borrow()
            .focused_handlers
            .get(&(focused_index as usize))
            .map(|handlers| handlers.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default()
    });
    handlers.iter().any(|handler| handler(event))
}

/// Dispatch pasted text to the focused component's paste handlers.
pub fn dispatch_paste(text: &str) -> bool {
    let focused = super::focus::get_focused_index();
    if focused < 0 {
        return false;
    }
    trace!(index = focused, len = text.len(), "paste");

    let handlers: Vec<PasteHandler> = REGISTRY.with(|reg| {
        reg.borrow()
            .paste_handlers
            .get(&(focused as usize))
            .map(|handlers| handlers.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default()
    });
    handlers.iter().any(|handler| handler(text))
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Subscribe to all keyboard events.
/// Return true from handler to consume the event.
/// Returns cleanup function.
pub fn on<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&KeyboardEvent) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.global_handlers.push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            reg.borrow_mut().global_handlers.retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

/// Subscribe to a specific key.
/// Return true to consume the event.
/// Returns cleanup function.
pub fn on_key<F>(key: &str, handler: F) -> impl FnOnce()
where
    F: Fn() -> bool + 'static,
{
    let key = key.to_string();
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.key_handlers
            .entry(key.clone())
            .or_default()
            .push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            if let Some(handlers) = reg.key_handlers.get_mut(&key) {
                handlers.retain(|(handler_id, _)| *handler_id != id);
                if handlers.is_empty() {
                    reg.key_handlers.remove(&key);
                }
            }
        });
    }
}

/// Subscribe to events when a specific component has focus.
/// Return true from handler to consume the event.
/// Returns cleanup function.
pub fn on_focused<F>(index: usize, handler: F) -> impl FnOnce()
where
    F: Fn(&KeyboardEvent) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.focused_handlers
            .entry(index)
            .or_default()
            .push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            if let Some(handlers) = reg.focused_handlers.get_mut(&index) {
                handlers.retain(|(handler_id, _)| *handler_id != id);
                if handlers.is_empty() {
                    reg.focused_handlers.remove(&index);
                }
            }
        });
    }
}

/// Receive pasted text while a specific component has focus.
/// Returns cleanup function.
pub fn on_paste_focused<F>(index: usize, handler: F) -> impl FnOnce()
where
    F: Fn(&str) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.paste_handlers
            .entry(index)
            .or_default()
            .push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            if let Some(handlers) = reg.paste_handlers.get_mut(&index) {
                handlers.retain(|(handler_id, _)| *handler_id != id);
                if handlers.is_empty() {
                    reg.paste_handlers.remove(&index);
                }
            }
        });
    }
}

/// Clean up all handlers for a component index.
pub fn cleanup_index(index: usize) {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.focused_handlers.remove(&index);
        reg.paste_handlers.remove(&index);
    });
}

// =============================================================================
// SOFT KEYBOARD
// =============================================================================

/// Contract for the on-screen keyboard a text field can show and dismiss.
///
/// Terminals have no on-screen keyboard. With [`TerminalKeyboard`] a
/// focused field places a caret in its frame while the keyboard is visible,
/// and the renderer shows the terminal cursor there. Hosts embedding the
/// widget elsewhere can inject their own implementation.
pub trait SoftKeyboard {
    fn show(&self);
    fn hide(&self);
    fn is_visible(&self) -> bool;
}

thread_local! {
    static KEYBOARD_VISIBLE: Signal<bool> = signal(false);
}

/// Default soft keyboard backed by a thread-local visibility signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalKeyboard;

impl SoftKeyboard for TerminalKeyboard {
    fn show(&self) {
        KEYBOARD_VISIBLE.with(|s| s.set(true));
    }

    fn hide(&self) {
        KEYBOARD_VISIBLE.with(|s| s.set(false));
    }

    fn is_visible(&self) -> bool {
        KEYBOARD_VISIBLE.with(|s| s.get())
    }
}

/// Whether the terminal soft keyboard (text cursor) is currently shown.
pub fn keyboard_visible() -> bool {
    TerminalKeyboard.is_visible()
}

// =============================================================================
// RESET
// =============================================================================

/// Clear all state and handlers.
pub fn cleanup() {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.global_handlers.clear();
        reg.key_handlers.clear();
        reg.focused_handlers.clear();
        reg.paste_handlers.clear();
    });
    KEYBOARD_VISIBLE.with(|s| s.set(false));
}

/// Reset keyboard state (for testing)
pub fn reset_keyboard_state() {
    cleanup();
    REGISTRY.with(|reg| reg.borrow_mut().next_id = 0);
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{allocate_index, reset_registry, set_focusable};
    use crate::state::focus::{focus, reset_focus_state};
    use std::cell::Cell;
    use std::rc::Rc;

    fn setup() {
        reset_keyboard_state();
        reset_focus_state();
        reset_registry();
    }

    #[test]
    fn test_initial_state() {
        setup();
        assert!(!keyboard_visible());
        assert!(!dispatch(KeyboardEvent::new("1")));
    }

    #[test]
    fn test_global_handler_cleanup() {
        setup();

        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let cleanup = on(move |_| {
            count_clone.set(count_clone.get() + 1);
            false
        });

        dispatch(KeyboardEvent::new("a"));
        dispatch(KeyboardEvent::new("b"));
        assert_eq!(count.get(), 2);

        cleanup();
        dispatch(KeyboardEvent::new("c"));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_key_handler_consumes_before_global() {
        setup();

        let reached = Rc::new(Cell::new(false));
        let reached_clone = reached.clone();

        let _c1 = on_key("Enter", || true);
        let _c2 = on(move |_| {
            reached_clone.set(true);
            false
        });

        assert!(dispatch(KeyboardEvent::new("Enter")));
        assert!(!reached.get());
    }

    #[test]
    fn test_focused_handler_runs_first() {
        setup();
        let idx = allocate_index(None);
        set_focusable(idx, true);

        let order = Rc::new(RefCell::new(Vec::new()));
        let o1 = order.clone();
        let o2 = order.clone();

        let _g = on(move |_| {
            o1.borrow_mut().push("global");
            false
        });
        let _f = on_focused(idx, move |_| {
            o2.borrow_mut().push("focused");
            false
        });

        // Not focused: only the global handler sees the event
        dispatch(KeyboardEvent::new("1"));
        assert_eq!(*order.borrow(), vec!["global"]);

        focus(idx);
        order.borrow_mut().clear();
        dispatch(KeyboardEvent::new("1"));
        assert_eq!(*order.borrow(), vec!["focused", "global"]);
    }

    #[test]
    fn test_release_not_dispatched() {
        setup();

        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let _cleanup = on(move |_| {
            count_clone.set(count_clone.get() + 1);
            false
        });

        dispatch(KeyboardEvent { state: KeyState::Repeat, ..KeyboardEvent::new("1") });
        dispatch(KeyboardEvent { state: KeyState::Release, ..KeyboardEvent::new("1") });
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_handler_may_unregister_during_dispatch() {
        setup();

        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let cleanup_slot: Rc<RefCell<Option<Box<dyn FnOnce()>>>> = Rc::new(RefCell::new(None));
        let slot_clone = cleanup_slot.clone();
        let cleanup = on(move |_| {
            count_clone.set(count_clone.get() + 1);
            if let Some(cleanup) = slot_clone.borrow_mut().take() {
                cleanup();
            }
            true
        });
        *cleanup_slot.borrow_mut() = Some(Box::new(cleanup));

        assert!(dispatch(KeyboardEvent::new("x")));
        assert!(!dispatch(KeyboardEvent::new("x")));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_paste_routed_to_focused() {
        setup();
        let idx = allocate_index(None);
        set_focusable(idx, true);

        let pasted = Rc::new(RefCell::new(String::new()));
        let pasted_clone = pasted.clone();
        let _cleanup = on_paste_focused(idx, move |text| {
            pasted_clone.borrow_mut().push_str(text);
            true
        });

        assert!(!dispatch_paste("1234"));
        focus(idx);
        assert!(dispatch_paste("1234"));
        assert_eq!(*pasted.borrow(), "1234");
    }

    #[test]
    fn test_terminal_keyboard_show_hide() {
        setup();
        let keyboard = TerminalKeyboard;

        keyboard.show();
        assert!(keyboard_visible());
        keyboard.hide();
        assert!(!keyboard.is_visible());
    }
}
