//! Focus System - Focus state, navigation and focus handles
//!
//! Manages focus state and navigation:
//! - `focused_index` signal (currently focused component)
//! - Focus cycling (Tab/Shift+Tab)
//! - Focus callbacks (onFocus/onBlur)
//! - [`FocusRequester`], a per-widget handle that acquires and releases focus
//!
//! # Example
//!
//! ```ignore
//! use spark_otp::state::focus::{self, FocusRequester};
//!
//! let requester = FocusRequester::new(component_index);
//! requester.request_focus();
//!
//! // Release and make sure nothing is refocused implicitly.
//! requester.free_focus();
//! focus::clear_focus();
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use spark_signals::{signal, Signal};
use tracing::trace;

use crate::engine::{get_allocated_indices, get_focusable, get_tab_index};

// =============================================================================
// FOCUSED INDEX SIGNAL
// =============================================================================

thread_local! {
    static FOCUSED_INDEX: Signal<i32> = signal(-1);
}

/// Get the currently focused component index (-1 if none)
pub fn get_focused_index() -> i32 {
    FOCUSED_INDEX.with(|s| s.get())
}

/// Check if any component is focused
pub fn has_focus() -> bool {
    get_focused_index() >= 0
}

/// Check if specific component is focused
pub fn is_focused(index: usize) -> bool {
    get_focused_index() == index as i32
}

// =============================================================================
// FOCUS CALLBACKS
// =============================================================================

/// Callbacks fired when focus changes
#[derive(Default)]
pub struct FocusCallbacks {
    pub on_focus: Option<Box<dyn Fn()>>,
    pub on_blur: Option<Box<dyn Fn()>>,
}

thread_local! {
    static FOCUS_CALLBACK_REGISTRY: RefCell<HashMap<usize, Vec<(usize, Rc<FocusCallbacks>)>>> = RefCell::new(HashMap::new());
    static NEXT_CALLBACK_ID: RefCell<usize> = const { RefCell::new(0) };
}

/// Register focus callbacks for a component.
/// Returns cleanup function to unregister.
pub fn register_callbacks(index: usize, callbacks: FocusCallbacks) -> impl FnOnce() {
    let callback_id = NEXT_CALLBACK_ID.with(|next| {
        let mut next = next.borrow_mut();
        let id = *next;
        *next += 1;
        id
    });

    FOCUS_CALLBACK_REGISTRY.with(|reg| {
        reg.borrow_mut()
            .entry(index)
            .or_default()
            .push((callback_id, Rc::new(callbacks)));
    });

    move || {
        FOCUS_CALLBACK_REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            if let Some(list) = reg.get_mut(&index) {
                list.retain(|(id, _)| *id != callback_id);
                if list.is_empty() {
                    reg.remove(&index);
                }
            }
        });
    }
}

/// Run `on_focus` or `on_blur` for every callback set on `index`.
///
/// Runs against a snapshot so a callback may itself change focus or
/// unregister callbacks.
fn fire_callbacks(index: usize, focus_gained: bool) {
    let snapshot: Vec<Rc<FocusCallbacks>> = FOCUS_CALLBACK_REGISTRY.with(|reg| {
        reg.borrow()
            .get(&index)
            .map(|list| list.iter().map(|(_, cb)| cb.clone()).collect())
            .unwrap_or_default()
    });

    for cb in snapshot {
        let handler = if focus_gained { &cb.on_focus } else { &cb.on_blur };
        if let Some(handler) = handler {
            handler();
        }
    }
}

/// Internal: Set focus and fire callbacks at the source
fn set_focus_with_callbacks(new_index: i32) {
    let old_index = get_focused_index();

    if old_index == new_index {
        return;
    }

    trace!(from = old_index, to = new_index, "focus change");

    if old_index >= 0 {
        fire_callbacks(old_index as usize, false);
    }

    FOCUSED_INDEX.with(|s| s.set(new_index));

    if new_index >= 0 {
        fire_callbacks(new_index as usize, true);
    }
}

// =============================================================================
// FOCUSABLE QUERIES
// =============================================================================

/// Get all focusable component indices, sorted by tab index
pub fn get_focusable_indices() -> Vec<usize> {
    let mut result: Vec<usize> = get_allocated_indices()
        .into_iter()
        .filter(|&i| get_focusable(i))
        .collect();

    // Same tab index keeps allocation order
    result.sort_by_key(|&i| (get_tab_index(i), i));
    result
}

// =============================================================================
// FOCUS NAVIGATION
// =============================================================================

/// Find next focusable component in `direction` (1 or -1), wrapping around.
fn find_next_focusable(from_index: i32, direction: i32) -> i32 {
    let focusables = get_focusable_indices();
    if focusables.is_empty() {
        return -1;
    }

    let current_pos = if from_index >= 0 {
        focusables.iter().position(|&i| i == from_index as usize)
    } else {
        None
    };

    match current_pos {
        None if direction == 1 => focusables[0] as i32,
        None => focusables[focusables.len() - 1] as i32,
        Some(pos) => {
            let len = focusables.len() as i32;
            let next_pos = ((pos as i32 + direction) % len + len) % len;
            focusables[next_pos as usize] as i32
        }
    }
}

/// Move focus to next focusable component
pub fn focus_next() -> bool {
    let current = get_focused_index();
    let next = find_next_focusable(current, 1);
    if next != -1 && next != current {
        set_focus_with_callbacks(next);
        return true;
    }
    false
}

/// Move focus to previous focusable component
pub fn focus_previous() -> bool {
    let current = get_focused_index();
    let prev = find_next_focusable(current, -1);
    if prev != -1 && prev != current {
        set_focus_with_callbacks(prev);
        return true;
    }
    false
}

/// Focus a specific component by index.
///
/// Focusing the already-focused component is a no-op that still returns true.
pub fn focus(index: usize) -> bool {
    if get_focusable(index) {
        if !is_focused(index) {
                set_focus_with_callbacks(index as i32);
        }
        return true;
    }
    false
}

/// Blur `index` if it holds focus. Returns whether it did.
pub fn blur(index: usize) -> bool {
    if is_focused(index) {
        set_focus_with_callbacks(-1);
        true
    } else {
        false
    }
}

/// Clear focus whichever component holds it.
pub fn clear_focus() {
    set_focus_with_callbacks(-1);
}

// =============================================================================
// FOCUS REQUESTER
// =============================================================================

/// Focus handle exclusively owned by one component instance.
///
/// `request_focus` acquires focus for the component, `free_focus` gives it up.
/// Both are idempotent: requesting while focused and freeing while not
/// focused do nothing.
#[derive(Debug)]
pub struct FocusRequester {
    index: usize,
}

impl FocusRequester {
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Acquire focus. Returns false if the component cannot take focus.
    pub fn request_focus(&self) -> bool {
        focus(self.index)
    }

    /// Release focus if this component holds it. Returns whether it did.
    pub fn free_focus(&self) -> bool {
        blur(self.index)
    }

    pub fn has_focus(&self) -> bool {
        is_focused(self.index)
    }
}

// =============================================================================
// RESET (for testing)
// =============================================================================

/// Reset all focus state (for testing)
pub fn reset_focus_state() {
    FOCUS_CALLBACK_REGISTRY.with(|reg| reg.borrow_mut().clear());
    FOCUSED_INDEX.with(|s| s.set(-1));
}

// =============================================================================
// TESTS
// =============================================================================
