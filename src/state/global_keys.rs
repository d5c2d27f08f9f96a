//! Global Keys Module - Global keyboard shortcuts
//!
//! - Ctrl+C: Graceful shutdown
//! - Tab: Focus next component
//! - Shift+Tab: Focus previous component
//!
//! Registered on mount, cleaned up on unmount. Global handlers run after the
//! focused component's handlers, so a field that consumes Tab keeps it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use super::focus;
use super::keyboard;

/// Cleanup handle for global key handlers
pub struct GlobalKeysHandle {
    cleanups: Vec<Box<dyn FnOnce()>>,
}

impl GlobalKeysHandle {
    /// Clean up all global key handlers
    pub fn cleanup(self) {
        for cleanup in self.cleanups {
            cleanup();
        }
    }
}

/// Set up global key handlers.
///
/// Ctrl+C stores false into `running`.
pub fn setup_global_keys(running: Arc<AtomicBool>) -> GlobalKeysHandle {
    let ctrl_c = keyboard::on(move |event| {
        if event.modifiers.ctrl && event.key == "c" {
            debug!("ctrl+c: stopping");
            running.store(false, Ordering::SeqCst);
            true
        } else {
            false
        }
    });

    let tab = keyboard::on(move |event| {
        if event.key != "Tab" {
            return false;
        }
        if event.modifiers.shift {
            focus::focus_previous();
        } else {
            focus::focus_next();
        }
        true
    });

    GlobalKeysHandle {
        cleanups: vec![Box::new(ctrl_c), Box::new(tab)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{allocate_index, reset_registry, set_focusable, set_tab_index};
    use crate::state::focus::reset_focus_state;
    use crate::state::keyboard::{reset_keyboard_state, KeyboardEvent, Modifiers};

    fn setup() {
        reset_registry();
        reset_focus_state();
        reset_keyboard_state();
    }

    fn focusable(tab_index: i32) -> usize {
        let index = allocate_index(None);
        set_focusable(index, true);
        set_tab_index(index, tab_index);
        index
    }

    #[test]
    fn test_ctrl_c_sets_running_false() {
        setup();
        let running = Arc::new(AtomicBool::new(true));
        let handle = setup_global_keys(running.clone());

        keyboard::dispatch(KeyboardEvent::with_modifiers("c", Modifiers::ctrl()));
        assert!(!running.load(Ordering::SeqCst));

        handle.cleanup();
    }

    #[test]
    fn test_plain_c_does_not_stop() {
        setup();
        let running = Arc::new(AtomicBool::new(true));
        let handle = setup_global_keys(running.clone());

        keyboard::dispatch(KeyboardEvent::new("c"));
        assert!(running.load(Ordering::SeqCst));

        handle.cleanup();
    }

    #[test]
    fn test_cleanup_removes_handlers() {
        setup();
        let running = Arc::new(AtomicBool::new(true));
        setup_global_keys(running.clone()).cleanup();

        keyboard::dispatch(KeyboardEvent::with_modifiers("c", Modifiers::ctrl()));
        assert!(running.load(Ordering::SeqCst));
    }

    #[test]
    fn test_tab_cycles_focus() {
        setup();
        let a = focusable(1);
        let b = focusable(2);
        let handle = setup_global_keys(Arc::new(AtomicBool::new(true)));

        focus::focus(a);
        keyboard::dispatch(KeyboardEvent::new("Tab"));
        assert!(focus::is_focused(b));

        keyboard::dispatch(KeyboardEvent::with_modifiers("Tab", Modifiers::shift()));
        assert!(focus::is_focused(a));

        handle.cleanup();
    }
}
