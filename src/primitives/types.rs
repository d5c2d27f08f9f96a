//! Primitive types - Props, callbacks and cleanup.
//!
//! Props support static values, signals, and getters so a caller can drive
//! the field from reactive state.

use std::rc::Rc;

use spark_signals::Signal;

use crate::state::SoftKeyboard;
use crate::types::Rgba;
use super::mask::MaskingTransform;

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function run when a component unmounts.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Callback Types
// =============================================================================

/// Called with the new value after every accepted edit.
pub type ValueChangeCallback = Rc<dyn Fn(&str)>;

/// Called once each time the value becomes complete.
pub type FilledCallback = Rc<dyn Fn()>;

// =============================================================================
// Prop Value - Reactive property wrapper
// =============================================================================

/// A property value that can be static, a signal, or a getter.
#[derive(Clone)]
pub enum PropValue<T: Clone + PartialEq + 'static> {
    /// Static value (not reactive).
    Static(T),
    /// Reactive signal, read on every access.
    Signal(Signal<T>),
    /// Getter function (called each time value is needed).
    Getter(Rc<dyn Fn() -> T>),
}

impl<T: Clone + PartialEq + 'static> PropValue<T> {
    /// Get the current value.
    pub fn get(&self) -> T {
        match self {
            PropValue::Static(v) => v.clone(),
            PropValue::Signal(s) => s.get(),
            PropValue::Getter(f) => f(),
        }
    }

    pub fn getter(f: impl Fn() -> T + 'static) -> Self {
        PropValue::Getter(Rc::new(f))
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for PropValue<T> {
    fn default() -> Self {
        PropValue::Static(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> From<T> for PropValue<T> {
    fn from(value: T) -> Self {
        PropValue::Static(value)
    }
}

impl<T: Clone + PartialEq + 'static> From<Signal<T>> for PropValue<T> {
    fn from(signal: Signal<T>) -> Self {
        PropValue::Signal(signal)
    }
}

impl From<&str> for PropValue<String> {
    fn from(value: &str) -> Self {
        PropValue::Static(value.to_string())
    }
}

// =============================================================================
// OTP Field Props
// =============================================================================

/// Properties for the OTP field.
///
/// The field is controlled: it renders `value` and reports edits through
/// `on_value_change`, but never stores the value itself. Wire the callback
/// back into the signal behind `value` for a normal editable field.
///
/// # Example
///
/// ```ignore
/// use spark_otp::primitives::{otp_field, OtpFieldProps};
/// use spark_signals::signal;
/// use std::rc::Rc;
///
/// let code = signal(String::new());
/// let sink = code.clone();
///
/// let field = otp_field(OtpFieldProps {
///     length: 4,
///     on_value_change: Some(Rc::new(move |v: &str| sink.set(v.to_string()))),
///     on_filled: Some(Rc::new(|| println!("done"))),
///     request_focus: true,
///     clear_focus_when_filled: true,
///     ..OtpFieldProps::new(code.clone())
/// })?;
/// ```
pub struct OtpFieldProps {
    /// Component ID (optional; generated if omitted).
    pub id: Option<String>,

    /// Current code. Only ASCII digits, at most `length` of them.
    pub value: PropValue<String>,
    pub on_value_change: Option<ValueChangeCallback>,

    /// Number of slots and the completion length.
    pub length: usize,
    pub on_filled: Option<FilledCallback>,

    /// Non-blank text puts every slot into the error state.
    pub error_message: Option<PropValue<Option<String>>>,
    /// Shown only when there is no error text.
    pub helper_text: Option<PropValue<Option<String>>>,
    /// Helper text color (default: theme `text`).
    pub helper_text_color: Option<Rgba>,
    /// Slot glyph color (default: theme `text`).
    pub text_color: Option<Rgba>,

    pub enabled: PropValue<bool>,
    pub read_only: PropValue<bool>,
    pub mask: PropValue<MaskingTransform>,

    /// Take focus on mount.
    pub request_focus: bool,
    /// Release focus and clear ambient focus once the value is complete.
    pub clear_focus_when_filled: bool,
    /// Animate slot transitions (default: true).
    pub animate: bool,

    /// Tab order (lower first).
    pub tab_index: Option<i32>,
    /// Soft keyboard to show/hide (default: [`TerminalKeyboard`](crate::state::TerminalKeyboard)).
    pub keyboard: Option<Rc<dyn SoftKeyboard>>,
}

impl Default for OtpFieldProps {
    fn default() -> Self {
        Self {
            id: None,
            value: PropValue::Static(String::new()),
            on_value_change: None,
            length: 6,
            on_filled: None,
            error_message: None,
            helper_text: None,
            helper_text_color: None,
            text_color: None,
            enabled: PropValue::Static(true),
            read_only: PropValue::Static(false),
            mask: PropValue::Static(MaskingTransform::obscured()),
            request_focus: false,
            clear_focus_when_filled: false,
            animate: true,
            tab_index: None,
            keyboard: None,
        }
    }
}

impl OtpFieldProps {
    /// Props bound to `value`, everything else default.
    pub fn new(value: impl Into<PropValue<String>>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }
}
