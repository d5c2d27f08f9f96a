//! # spark-otp
//!
//! Segmented one-time-code input for terminal UIs.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! reactive props and thread-local state.
//!
//! ## Architecture
//!
//! The field is a controlled component: the caller owns the code, the field
//! validates edits, reports them, and fires a completion callback once per
//! transition into the filled state.
//!
//! ```text
//! key/paste event → focused handler → OtpController::propose
//!                 → on_value_change → (caller updates value) → on_filled
//! frame tick      → OtpFieldHandle::render → FrameBuffer → DiffRenderer
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Colors, cells, rectangles, border styles
//! - [`engine`] - Component index registry
//! - [`state`] - Focus, keyboard, clipboard, input routing, animation
//! - [`theme`] - Semantic colors and presets
//! - [`layout`] - Taffy slot-row geometry and text measuring
//! - [`renderer`] - Frame buffer and differential terminal output
//! - [`pipeline`] - Terminal mount and frame loop
//! - [`primitives`] - The OTP field itself

pub mod engine;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod primitives;
pub mod renderer;
pub mod state;
pub mod theme;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{OtpError, Result};

pub use engine::{allocate_index, get_id, get_index, is_allocated, release_index, reset_registry};

pub use layout::{compute_otp_layout, string_width, truncate_text, OtpLayout};

pub use renderer::{DiffRenderer, FrameBuffer};

pub use pipeline::{
    mount, run, set_terminal_size, terminal_height, terminal_width, tick, unmount, MountHandle,
};

pub use primitives::{
    decompose, otp_field, resolve_message, EditOutcome, FilledCallback, MaskingTransform, Message,
    MessageKind, OtpController, OtpFieldHandle, OtpFieldProps, PropValue, RejectReason, Slot,
    SlotState, SlotVisual, ValueChangeCallback, MAX_OTP_LENGTH,
};

pub use state::{
    // Focus
    blur, clear_focus, focus, focus_next, focus_previous, get_focused_index, has_focus,
    is_focused, register_callbacks, reset_focus_state, FocusCallbacks, FocusRequester,
    // Keyboard
    dispatch as dispatch_keyboard, dispatch_paste, keyboard_visible, on_focused,
    reset_keyboard_state, KeyboardEvent, KeyState, Modifiers, SoftKeyboard, TerminalKeyboard,
};

pub use theme::{
    active_theme, get_preset, preset_names, reset_theme, set_theme, set_theme_by_name, t, Theme,
    ThemeAccessor, ThemeColor,
};
