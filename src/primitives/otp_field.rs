//! OTP Field Primitive - Segmented one-time-code input.
//!
//! A controlled, digits-only input drawn as `length` bordered slots with a
//! message line underneath. The field never stores the code: every accepted
//! edit is reported through `on_value_change` and the caller decides what
//! `value` becomes.
//!
//! # Example
//!
//! ```ignore
//! use spark_otp::primitives::{otp_field, OtpFieldProps};
//! use spark_signals::signal;
//! use std::rc::Rc;
//!
//! let code = signal(String::new());
//! let sink = code.clone();
//!
//! let field = otp_field(OtpFieldProps {
//!     length: 6,
//!     on_value_change: Some(Rc::new(move |v: &str| sink.set(v.to_string()))),
//!     on_filled: Some(Rc::new(|| verify())),
//!     request_focus: true,
//!     ..OtpFieldProps::new(code.clone())
//! })?;
//!
//! field.render(&mut buffer, area, Instant::now())?;
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, trace};

use crate::engine::{allocate_index, get_focusable, release_index, set_focusable, set_tab_index};
use crate::error::{OtpError, Result};
use crate::layout::{compute_otp_layout, string_width, truncate_text};
use crate::renderer::FrameBuffer;
use crate::state::animate::{GlyphFrame, SlotAnimation};
use crate::state::{clipboard, focus, keyboard};
use crate::state::{FocusCallbacks, FocusRequester, KeyboardEvent, SoftKeyboard, TerminalKeyboard};
use crate::theme::t;
use crate::types::{Attr, BorderStyle, ClipRect, Rgba};
use super::mask::MaskingTransform;
use super::types::{Cleanup, FilledCallback, OtpFieldProps, PropValue, ValueChangeCallback};

/// Longest code a field accepts.
pub const MAX_OTP_LENGTH: usize = 64;

/// Glyphs fainter than this are not drawn.
const MIN_VISIBLE_OPACITY: f32 = 0.2;

/// Brightness of slot text while disabled.
const DISABLED_DIM: f32 = 0.5;

// =============================================================================
// Input Controller
// =============================================================================

/// Why a proposed value was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Contains something other than ASCII `0`-`9`.
    NotDigits,
    /// Longer than the configured length.
    TooLong,
    Disabled,
    ReadOnly,
}

/// Result of proposing a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Valid, reported to `on_value_change`.
    Accepted,
    /// Valid and completes the code: change reported, then completion ran.
    Filled,
    /// Same as the current value; nothing happens.
    Unchanged,
    Rejected(RejectReason),
}

impl EditOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, EditOutcome::Accepted | EditOutcome::Filled)
    }
}

/// Validation and completion tracking for a controlled code value.
///
/// The controller remembers the last value it saw or emitted. When the
/// caller's value differs from that (an external write, or an accepted edit
/// the caller ignored), the completion latch is re-derived from the caller's
/// value before the next decision. Completion is reported only on the
/// transition from short to full.
#[derive(Debug, Clone)]
pub struct OtpController {
    length: usize,
    last_seen: String,
    completed: bool,
}

impl OtpController {
    /// A controller for `length` digits that starts out observing `initial`.
    /// An `initial` value that is already full does not count as completing.
    pub fn new(length: usize, initial: &str) -> Self {
        Self {
            length,
            last_seen: initial.to_string(),
            completed: initial.chars().count() == length,
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Digits only, no longer than `length`. Empty is valid.
    pub fn validate(&self, candidate: &str) -> std::result::Result<(), RejectReason> {
        if !candidate.chars().all(|c| c.is_ascii_digit()) {
            return Err(RejectReason::NotDigits);
        }
        if candidate.len() > self.length {
            return Err(RejectReason::TooLong);
        }
        Ok(())
    }

    /// Decide what replacing `current` with `candidate` means.
    ///
    /// Pure bookkeeping: the caller runs the side effects the outcome asks for.
    pub fn propose(&mut self, current: &str, candidate: &str) -> EditOutcome {
        if current != self.last_seen {
            self.completed = current.chars().count() == self.length;
            self.last_seen = current.to_string();
        }
        if candidate == current {
            return EditOutcome::Unchanged;
        }
        if let Err(reason) = self.validate(candidate) {
            return EditOutcome::Rejected(reason);
        }

        let filled = candidate.len() == self.length;
        let completes = filled && !self.completed;
        self.completed = filled;
        self.last_seen = candidate.to_string();

        if completes {
            EditOutcome::Filled
        } else {
            EditOutcome::Accepted
        }
    }
}

// =============================================================================
// Render Decomposition
// =============================================================================

/// One position of the code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub index: usize,
    /// Masked text for the digit at this position, `None` past the end.
    pub glyph: Option<String>,
}

impl Slot {
    pub fn is_occupied(&self) -> bool {
        self.glyph.is_some()
    }
}

/// Split `value` into exactly `length` slots, masking each digit.
pub fn decompose(value: &str, length: usize, mask: &MaskingTransform) -> Vec<Slot> {
    let mut chars = value.chars();
    (0..length)
        .map(|index| Slot {
            index,
            glyph: chars.next().map(|c| mask.apply(c)),
        })
        .collect()
}

/// Visual state of a slot, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Error,
    Disabled,
    Filled,
    Empty,
}

impl SlotState {
    pub fn derive(occupied: bool, error: bool, enabled: bool) -> Self {
        if error {
            SlotState::Error
        } else if !enabled {
            SlotState::Disabled
        } else if occupied {
            SlotState::Filled
        } else {
            SlotState::Empty
        }
    }
}

/// Colors a slot is drawn with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotVisual {
    pub state: SlotState,
    pub occupied: bool,
    pub border: Rgba,
    pub text: Rgba,
}

impl SlotVisual {
    /// Resolve colors against the active theme.
    pub fn derive(occupied: bool, error: bool, enabled: bool, text_color: Rgba) -> Self {
        let theme = t();
        let state = SlotState::derive(occupied, error, enabled);

        let border = match state {
            SlotState::Error => theme.error(),
            SlotState::Disabled => theme.text_disabled(),
            SlotState::Filled => theme.primary(),
            SlotState::Empty => theme.text_muted(),
        };
        let text = match state {
            SlotState::Error => theme.error(),
            SlotState::Disabled if text_color.is_ansi() => theme.text_disabled(),
            SlotState::Disabled => text_color.dim(DISABLED_DIM),
            SlotState::Filled | SlotState::Empty => text_color,
        };

        Self { state, occupied, border, text }
    }
}

// =============================================================================
// Message Line
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Error,
    Helper,
}

/// Text shown on the line under the slots.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
    pub color: Rgba,
}

fn is_error(error: Option<&str>) -> bool {
    error.is_some_and(|e| !e.trim().is_empty())
}

/// Non-blank error text wins; helper text shows only without one.
pub fn resolve_message(error: Option<&str>, helper: Option<&str>, helper_color: Rgba) -> Option<Message> {
    if let Some(text) = error.filter(|_| is_error(error)) {
        return Some(Message {
            kind: MessageKind::Error,
            text: text.to_string(),
            color: t().error(),
        });
    }
    helper.map(|text| Message {
        kind: MessageKind::Helper,
        text: text.to_string(),
        color: helper_color,
    })
}

// =============================================================================
// Field State
// =============================================================================

struct FieldInner {
    index: usize,
    length: usize,
    value: PropValue<String>,
    on_value_change: Option<ValueChangeCallback>,
    on_filled: Option<FilledCallback>,
    error_message: Option<PropValue<Option<String>>>,
    helper_text: Option<PropValue<Option<String>>>,
    helper_text_color: Option<Rgba>,
    text_color: Option<Rgba>,
    enabled: PropValue<bool>,
    read_only: PropValue<bool>,
    mask: PropValue<MaskingTransform>,
    clear_focus_when_filled: bool,
    animate: bool,
    keyboard: Rc<dyn SoftKeyboard>,
    requester: FocusRequester,
    controller: RefCell<OtpController>,
    animations: RefCell<Option<Vec<SlotAnimation>>>,
}

impl FieldInner {
    /// Keep the registry's focusable flag in step with `enabled`; a field
    /// that becomes disabled gives up focus.
    fn sync_enabled(&self) -> bool {
        let enabled = self.enabled.get();
        if get_focusable(self.index) != enabled {
            set_focusable(self.index, enabled);
            if !enabled && self.requester.free_focus() {
                debug!(index = self.index, "disabled otp field released focus");
            }
        }
        enabled
    }

    fn propose(&self, candidate: &str) -> EditOutcome {
        if !self.sync_enabled() {
            trace!(index = self.index, "edit ignored: disabled");
            return EditOutcome::Rejected(RejectReason::Disabled);
        }
        if self.read_only.get() {
            trace!(index = self.index, "edit ignored: read-only");
            return EditOutcome::Rejected(RejectReason::ReadOnly);
        }

        let current = self.value.get();
        // Borrow ends before any callback runs; callbacks may edit again.
        let outcome = self.controller.borrow_mut().propose(&current, candidate);

        match outcome {
            EditOutcome::Rejected(reason) => {
                trace!(index = self.index, ?reason, "edit rejected");
            }
            EditOutcome::Unchanged => {}
            EditOutcome::Accepted | EditOutcome::Filled => {
                trace!(index = self.index, len = candidate.len(), "edit accepted");
                if let Some(on_change) = &self.on_value_change {
                    on_change(candidate);
                }
                if outcome == EditOutcome::Filled {
                    self.complete();
                }
            }
        }
        outcome
    }

    fn complete(&self) {
        debug!(index = self.index, length = self.length, "otp filled");
        self.keyboard.hide();
        if self.clear_focus_when_filled {
            self.requester.free_focus();
            focus::clear_focus();
        }
        if let Some(on_filled) = &self.on_filled {
            on_filled();
        }
    }

    fn append(&self, text: &str) -> EditOutcome {
        let mut candidate = self.value.get();
        candidate.push_str(text);
        self.propose(&candidate)
    }

    fn backspace(&self) -> EditOutcome {
        let mut candidate = self.value.get();
        candidate.pop();
        self.propose(&candidate)
    }

    fn handle_key(&self, event: &KeyboardEvent) -> bool {
        let m = &event.modifiers;
        if m.ctrl || m.alt || m.meta {
            if m.ctrl && event.key.eq_ignore_ascii_case("v") {
                if let Some(text) = clipboard::paste() {
                    self.append(&text);
                }
                return true;
            }
            return false;
        }

        match event.key.as_str() {
            "Backspace" => {
                self.backspace();
                true
            }
            "Enter" => {
                self.keyboard.hide();
                true
            }
            key if key.chars().count() == 1 => {
                self.append(key);
                true
            }
            _ => false,
        }
    }

    fn error_text(&self) -> Option<String> {
        self.error_message.as_ref().and_then(|p| p.get())
    }

    fn text_color(&self) -> Rgba {
        self.text_color.unwrap_or_else(|| t().text())
    }
}

// =============================================================================
// OTP Field Handle
// =============================================================================

/// A mounted OTP field. Dropping it unmounts the field.
pub struct OtpFieldHandle {
    inner: Rc<FieldInner>,
    cleanups: Vec<Cleanup>,
}

impl OtpFieldHandle {
    /// Component index in the registry.
    pub fn index(&self) -> usize {
        self.inner.index
    }

    pub fn length(&self) -> usize {
        self.inner.length
    }

    /// The caller's current value.
    pub fn value(&self) -> String {
        self.inner.value.get()
    }

    pub fn is_filled(&self) -> bool {
        self.value().chars().count() == self.inner.length
    }

    pub fn has_focus(&self) -> bool {
        self.inner.requester.has_focus()
    }

    /// Take focus (no-op if already focused or disabled).
    pub fn request_focus(&self) -> bool {
        self.inner.sync_enabled() && self.inner.requester.request_focus()
    }

    /// Give up focus if held.
    pub fn free_focus(&self) -> bool {
        self.inner.requester.free_focus()
    }

    /// Propose a whole new value, as an edit gesture would.
    pub fn propose(&self, candidate: &str) -> EditOutcome {
        self.inner.propose(candidate)
    }

    /// Slots for the current value with their resolved visuals.
    pub fn slots(&self) -> Vec<(Slot, SlotVisual)> {
        let inner = &self.inner;
        let error = is_error(inner.error_text().as_deref());
        let enabled = inner.enabled.get();
        let text_color = inner.text_color();

        decompose(&inner.value.get(), inner.length, &inner.mask.get())
            .into_iter()
            .map(|slot| {
                let visual = SlotVisual::derive(slot.is_occupied(), error, enabled, text_color);
                (slot, visual)
            })
            .collect()
    }

    /// Current message line content, if any.
    pub fn message(&self) -> Option<Message> {
        let inner = &self.inner;
        let helper = inner.helper_text.as_ref().and_then(|p| p.get());
        let helper_color = inner.helper_text_color.unwrap_or_else(|| t().text());
        resolve_message(inner.error_text().as_deref(), helper.as_deref(), helper_color)
    }

    /// True while a slot transition is still running at `now`.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.inner
            .animations
            .borrow()
            .as_ref()
            .is_some_and(|anims| anims.iter().any(|a| a.is_animating(now)))
    }

    /// Draw the field into `area` as it looks at `now`.
    pub fn render(&self, buffer: &mut FrameBuffer, area: ClipRect, now: Instant) -> Result<()> {
        let inner = &self.inner;
        inner.sync_enabled();

        let layout = compute_otp_layout(area, inner.length)?;
        let slots = self.slots();
        let background = t().background();

        let mut animations = inner.animations.borrow_mut();
        let first_frame = animations.is_none();
        let animations = animations.get_or_insert_with(|| {
            slots
                .iter()
                .map(|(_, visual)| SlotAnimation::new(visual.border, visual.text, now))
                .collect()
        });
        // Content present at mount appears without a transition.
        let animate = inner.animate && !first_frame;

        for (((slot, visual), rect), anim) in slots.iter().zip(&layout.slots).zip(animations.iter_mut()) {
            let content = slot.glyph.as_deref().unwrap_or("");
            anim.observe(content, visual.border, visual.text, now, animate);
            let frame = anim.frame(now);

            buffer.draw_border(*rect, BorderStyle::Rounded, frame.border);
            for glyph in frame.leaving.iter().chain(frame.entering.iter()) {
                draw_glyph(buffer, *rect, glyph, frame.text, background);
            }
        }

        // The caret marks the next empty slot while the soft keyboard is up.
        if self.has_focus() && inner.keyboard.is_visible() {
            let next = inner.value.get().chars().count();
            if let Some(rect) = layout.slots.get(next) {
                let (x, y) = (rect.x + rect.width / 2, rect.y + rect.height / 2);
                if area.contains(x, y) {
                    buffer.set_caret(x, y);
                }
            }
        }

        if let Some(message) = self.message() {
            let line = layout.message;
            let text = truncate_text(&message.text, line.width);
            let x = line.x + line.width.saturating_sub(string_width(&text)) / 2;
            buffer.draw_text(x, line.y, &text, message.color, Attr::NONE, line);
        }
        Ok(())
    }

    /// Remove handlers and release the component index.
    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for OtpFieldHandle {
    fn drop(&mut self) {
        self.inner.requester.free_focus();
        for cleanup in self.cleanups.drain(..) {
            cleanup();
        }
        debug!(index = self.inner.index, "otp field unmounted");
    }
}

/// Draw one glyph centered in the slot interior, shifted by its transition
/// offset (in interior heights) and faded toward the background.
fn draw_glyph(buffer: &mut FrameBuffer, rect: ClipRect, glyph: &GlyphFrame, color: Rgba, background: Rgba) {
    let Some((fg, attrs)) = fade(color, background, glyph.frame.opacity) else { return };

    let interior = ClipRect::new(
        rect.x.saturating_add(1),
        rect.y.saturating_add(1),
        rect.width.saturating_sub(2),
        rect.height.saturating_sub(2),
    );
    if interior.width == 0 || interior.height == 0 {
        return;
    }

    let shift = (glyph.frame.offset * interior.height as f32).round() as i32;
    let row = i32::from(interior.y) + (i32::from(interior.height) - 1) / 2 + shift;
    let Ok(row) = u16::try_from(row) else { return };

    let text = truncate_text(&glyph.text, interior.width);
    let x = interior.x + interior.width.saturating_sub(string_width(&text)) / 2;
    buffer.draw_text(x, row, &text, fg, attrs | Attr::BOLD, interior);
}

/// Foreground and attributes for text at `opacity`, or `None` when too faint.
/// Colors the terminal owns cannot be mixed, so they dim instead.
fn fade(color: Rgba, background: Rgba, opacity: f32) -> Option<(Rgba, Attr)> {
    if opacity < MIN_VISIBLE_OPACITY {
        return None;
    }
    if opacity >= 1.0 {
        return Some((color, Attr::NONE));
    }
    let special = |c: Rgba| c.is_terminal_default() || c.is_ansi();
    if special(color) || special(background) {
        Some((color, Attr::DIM))
    } else {
        Some((Rgba::lerp(background, color, opacity), Attr::NONE))
    }
}

// =============================================================================
// OTP Field Component
// =============================================================================

/// Mount an OTP field.
///
/// Registers the focused-key and paste handlers, focus callbacks that show
/// and hide the soft keyboard, and takes focus when `request_focus` is set
/// and the field is enabled.
///
/// Returns [`OtpError::InvalidLength`] when `length` is 0 or above
/// [`MAX_OTP_LENGTH`].
pub fn otp_field(props: OtpFieldProps) -> Result<OtpFieldHandle> {
    if props.length == 0 || props.length > MAX_OTP_LENGTH {
        return Err(OtpError::InvalidLength(props.length));
    }

    let index = allocate_index(props.id.as_deref());
    let enabled = props.enabled.get();
    set_focusable(index, enabled);
    if let Some(tab_index) = props.tab_index {
        set_tab_index(index, tab_index);
    }

    let soft_keyboard: Rc<dyn SoftKeyboard> =
        props.keyboard.unwrap_or_else(|| Rc::new(TerminalKeyboard));
    let initial = props.value.get();

    let inner = Rc::new(FieldInner {
        index,
        length: props.length,
        controller: RefCell::new(OtpController::new(props.length, &initial)),
        value: props.value,
        on_value_change: props.on_value_change,
        on_filled: props.on_filled,
        error_message: props.error_message,
        helper_text: props.helper_text,
        helper_text_color: props.helper_text_color,
        text_color: props.text_color,
        enabled: props.enabled,
        read_only: props.read_only,
        mask: props.mask,
        clear_focus_when_filled: props.clear_focus_when_filled,
        animate: props.animate,
        keyboard: soft_keyboard.clone(),
        requester: FocusRequester::new(index),
        animations: RefCell::new(None),
    });

    let key_inner = inner.clone();
    let key_cleanup = keyboard::on_focused(index, move |event| key_inner.handle_key(event));

    let paste_inner = inner.clone();
    let paste_cleanup = keyboard::on_paste_focused(index, move |text| {
        paste_inner.append(text);
        true
    });

    let show = soft_keyboard.clone();
    let hide = soft_keyboard;
    let focus_cleanup = focus::register_callbacks(
        index,
        FocusCallbacks {
            on_focus: Some(Box::new(move || {
                trace!(index, "otp field focused");
                show.show();
            })),
            on_blur: Some(Box::new(move || {
                trace!(index, "otp field blurred");
                hide.hide();
            })),
        },
    );

    let cleanups: Vec<Cleanup> = vec![
        Box::new(key_cleanup),
        Box::new(paste_cleanup),
        Box::new(focus_cleanup),
        Box::new(move || {
            keyboard::cleanup_index(index);
            release_index(index);
        }),
    ];

    debug!(index, length = props.length, "otp field mounted");

    let handle = OtpFieldHandle { inner, cleanups };
    if props.request_focus && enabled {
        handle.inner.requester.request_focus();
    }
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{get_allocated_count, reset_registry};
    use crate::state::{
        dispatch, dispatch_paste, get_focused_index, keyboard_visible, reset_focus_state,
        reset_keyboard_state, Modifiers,
    };
    use crate::theme::reset_theme;
    use spark_signals::signal;
    use std::cell::Cell;
    use std::time::Duration;

    fn setup() {
        reset_registry();
        reset_focus_state();
        reset_keyboard_state();
        reset_theme();
        clipboard::clear();
    }

    fn press(key: &str) {
        dispatch(KeyboardEvent::new(key));
    }

    fn type_digits(digits: &str) {
        for c in digits.chars() {
            press(&c.to_string());
        }
    }

    /// A field wired to a signal the way a real caller would.
    struct Harness {
        code: spark_signals::Signal<String>,
        changes: Rc<RefCell<Vec<String>>>,
        filled: Rc<Cell<usize>>,
    }

    impl Harness {
        fn new(initial: &str) -> Self {
            Self {
                code: signal(initial.to_string()),
                changes: Rc::new(RefCell::new(Vec::new())),
                filled: Rc::new(Cell::new(0)),
            }
        }

        fn props(&self, length: usize) -> OtpFieldProps {
            let code = self.code.clone();
            let changes = self.changes.clone();
            let filled = self.filled.clone();
            OtpFieldProps {
                length,
                on_value_change: Some(Rc::new(move |v: &str| {
                    changes.borrow_mut().push(v.to_string());
                    code.set(v.to_string());
                })),
                on_filled: Some(Rc::new(move || filled.set(filled.get() + 1))),
                mask: MaskingTransform::identity().into(),
                ..OtpFieldProps::new(self.code.clone())
            }
        }
    }

    // -------------------------------------------------------------------------
    // Controller
    // -------------------------------------------------------------------------

    #[test]
    fn test_controller_accepts_digits() {
        let mut c = OtpController::new(6, "");
        assert_eq!(c.propose("", "1"), EditOutcome::Accepted);
        assert_eq!(c.propose("1", "12"), EditOutcome::Accepted);
        assert_eq!(c.propose("12", ""), EditOutcome::Accepted);
    }

    #[test]
    fn test_controller_rejects_invalid() {
        let mut c = OtpController::new(4, "");
        assert_eq!(c.propose("", "12a4"), EditOutcome::Rejected(RejectReason::NotDigits));
        assert_eq!(c.propose("", "12345"), EditOutcome::Rejected(RejectReason::TooLong));
        assert_eq!(c.propose("", "١٢"), EditOutcome::Rejected(RejectReason::NotDigits));
        assert_eq!(c.propose("", " 1"), EditOutcome::Rejected(RejectReason::NotDigits));
    }

    #[test]
    fn test_controller_fills_once_per_transition() {
        let mut c = OtpController::new(3, "");
        assert_eq!(c.propose("", "12"), EditOutcome::Accepted);
        assert_eq!(c.propose("12", "123"), EditOutcome::Filled);
        assert_eq!(c.propose("123", "123"), EditOutcome::Unchanged);
        assert_eq!(c.propose("123", "12"), EditOutcome::Accepted);
        assert_eq!(c.propose("12", "123"), EditOutcome::Filled);
    }

    #[test]
    fn test_controller_full_at_mount_does_not_fill() {
        let mut c = OtpController::new(4, "1234");
        assert_eq!(c.propose("1234", "1234"), EditOutcome::Unchanged);
        assert_eq!(c.propose("1234", "123"), EditOutcome::Accepted);
        assert_eq!(c.propose("123", "1234"), EditOutcome::Filled);
    }

    #[test]
    fn test_controller_reobserves_external_value() {
        let mut c = OtpController::new(4, "");
        c.propose("", "1");
        // Caller replaced the value with a full code behind our back.
        assert_eq!(c.propose("9876", "987"), EditOutcome::Accepted);
        assert_eq!(c.propose("987", "9876"), EditOutcome::Filled);
    }

    // -------------------------------------------------------------------------
    // Decomposition & visuals
    // -------------------------------------------------------------------------

    #[test]
    fn test_decompose_pads_to_length() {
        let slots = decompose("12", 4, &MaskingTransform::identity());
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[0].glyph.as_deref(), Some("1"));
        assert_eq!(slots[1].glyph.as_deref(), Some("2"));
        assert!(!slots[2].is_occupied());
        assert_eq!(slots[3].index, 3);
    }

    #[test]
    fn test_decompose_masks() {
        let slots = decompose("58", 2, &MaskingTransform::obscured());
        assert!(slots.iter().all(|s| s.glyph.as_deref() == Some("•")));
    }

    #[test]
    fn test_visual_priority() {
        setup();
        let theme = t();
        let text = Rgba::WHITE;

        let error = SlotVisual::derive(true, true, false, text);
        assert_eq!(error.state, SlotState::Error);
        assert_eq!(error.border, theme.error());
        assert_eq!(error.text, theme.error());

        let disabled = SlotVisual::derive(true, false, false, text);
        assert_eq!(disabled.state, SlotState::Disabled);
        assert_eq!(disabled.border, theme.text_disabled());
        assert_eq!(disabled.text, text.dim(DISABLED_DIM));

        let filled = SlotVisual::derive(true, false, true, text);
        assert_eq!(filled.state, SlotState::Filled);
        assert_eq!(filled.border, theme.primary());
        assert_eq!(filled.text, text);

        let empty = SlotVisual::derive(false, false, true, text);
        assert_eq!(empty.state, SlotState::Empty);
        assert_eq!(empty.border, theme.text_muted());
    }

    #[test]
    fn test_message_error_suppresses_helper() {
        setup();
        let helper = Rgba::GREEN;

        let msg = resolve_message(Some("Invalid code"), Some("Check your SMS"), helper).unwrap();
        assert_eq!(msg.kind, MessageKind::Error);
        assert_eq!(msg.color, t().error());

        let msg = resolve_message(Some("   "), Some("Check your SMS"), helper).unwrap();
        assert_eq!(msg.kind, MessageKind::Helper);
        assert_eq!(msg.text, "Check your SMS");
        assert_eq!(msg.color, helper);

        assert!(resolve_message(None, None, helper).is_none());
    }

    #[test]
    fn test_fade() {
        assert_eq!(fade(Rgba::WHITE, Rgba::BLACK, 0.0), None);
        assert_eq!(fade(Rgba::WHITE, Rgba::BLACK, 1.0), Some((Rgba::WHITE, Attr::NONE)));
        let (mid, attrs) = fade(Rgba::WHITE, Rgba::BLACK, 0.5).unwrap();
        assert_eq!(attrs, Attr::NONE);
        assert!(mid.r > 0 && mid.r < 255);
        assert_eq!(
            fade(Rgba::ansi(4), Rgba::TERMINAL_DEFAULT, 0.5),
            Some((Rgba::ansi(4), Attr::DIM))
        );
    }

    // -------------------------------------------------------------------------
    // Mounted field
    // -------------------------------------------------------------------------

    #[test]
    fn test_invalid_length() {
        setup();
        assert!(matches!(
            otp_field(OtpFieldProps { length: 0, ..Default::default() }),
            Err(OtpError::InvalidLength(0))
        ));
        assert!(matches!(
            otp_field(OtpFieldProps { length: MAX_OTP_LENGTH + 1, ..Default::default() }),
            Err(OtpError::InvalidLength(_))
        ));
        assert_eq!(get_allocated_count(), 0);
    }

    #[test]
    fn test_mount_and_unmount() {
        setup();
        let field = otp_field(OtpFieldProps::default()).unwrap();
        assert_eq!(get_allocated_count(), 1);
        assert_eq!(field.slots().len(), 6);
        field.unmount();
        assert_eq!(get_allocated_count(), 0);
    }

    #[test]
    fn test_unmount_releases_focus() {
        setup();
        let field = otp_field(OtpFieldProps {
            request_focus: true,
            ..Default::default()
        })
        .unwrap();
        assert!(keyboard_visible());
        field.unmount();
        assert_eq!(get_focused_index(), -1);
        assert!(!keyboard_visible());
    }

    #[test]
    fn test_request_focus_on_mount() {
        setup();
        let field = otp_field(OtpFieldProps {
            request_focus: true,
            ..Default::default()
        })
        .unwrap();
        assert!(field.has_focus());
        assert!(keyboard_visible());
    }

    #[test]
    fn test_disabled_does_not_take_focus() {
        setup();
        let field = otp_field(OtpFieldProps {
            request_focus: true,
            enabled: false.into(),
            ..Default::default()
        })
        .unwrap();
        assert!(!field.has_focus());
        assert_eq!(field.propose("1"), EditOutcome::Rejected(RejectReason::Disabled));
    }

    #[test]
    fn test_typing_full_code() {
        setup();
        let h = Harness::new("");
        let field = otp_field(OtpFieldProps {
            request_focus: true,
            clear_focus_when_filled: true,
            ..h.props(6)
        })
        .unwrap();
        assert!(field.has_focus());

        type_digits("123456");

        assert_eq!(h.code.get(), "123456");
        assert_eq!(h.changes.borrow().len(), 6);
        assert_eq!(h.changes.borrow().last().map(String::as_str), Some("123456"));
        assert_eq!(h.filled.get(), 1);
        assert!(field.is_filled());
        assert!(!keyboard_visible());
        assert!(!field.has_focus());
        assert_eq!(get_focused_index(), -1);

        // Keys go nowhere once focus is gone.
        press("7");
        assert_eq!(h.code.get(), "123456");
    }

    #[test]
    fn test_filled_without_clear_keeps_focus() {
        setup();
        let h = Harness::new("");
        let field = otp_field(OtpFieldProps {
            request_focus: true,
            ..h.props(2)
        })
        .unwrap();
        type_digits("42");
        assert_eq!(h.filled.get(), 1);
        assert!(field.has_focus());
        assert!(!keyboard_visible());
    }

    #[test]
    fn test_change_precedes_filled() {
        setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (on_change, on_filled) = (log.clone(), log.clone());
        let field = otp_field(OtpFieldProps {
            length: 1,
            on_value_change: Some(Rc::new(move |v: &str| on_change.borrow_mut().push(format!("change:{v}")))),
            on_filled: Some(Rc::new(move || on_filled.borrow_mut().push("filled".to_string()))),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(field.propose("8"), EditOutcome::Filled);
        assert_eq!(*log.borrow(), vec!["change:8", "filled"]);
    }

    #[test]
    fn test_non_digit_keys_rejected() {
        setup();
        let h = Harness::new("");
        let _field = otp_field(OtpFieldProps {
            request_focus: true,
            ..h.props(4)
        })
        .unwrap();
        press("a");
        press("-");
        press(" ");
        assert!(h.changes.borrow().is_empty());
        assert_eq!(h.code.get(), "");
    }

    #[test]
    fn test_backspace() {
        setup();
        let h = Harness::new("12");
        let _field = otp_field(OtpFieldProps {
            request_focus: true,
            ..h.props(4)
        })
        .unwrap();
        press("Backspace");
        assert_eq!(h.code.get(), "1");
        press("Backspace");
        press("Backspace");
        assert_eq!(h.code.get(), "");
        // Nothing left to delete.
        assert_eq!(h.changes.borrow().len(), 2);
    }

    #[test]
    fn test_paste_scenarios() {
        setup();
        let h = Harness::new("");
        let _field = otp_field(OtpFieldProps {
            request_focus: true,
            ..h.props(4)
        })
        .unwrap();

        dispatch_paste("12a4");
        assert!(h.changes.borrow().is_empty());
        dispatch_paste("12345");
        assert!(h.changes.borrow().is_empty());
        assert_eq!(h.filled.get(), 0);

        dispatch_paste("1234");
        assert_eq!(h.code.get(), "1234");
        assert_eq!(h.filled.get(), 1);
    }

    #[test]
    fn test_ctrl_v_pastes_clipboard() {
        setup();
        let h = Harness::new("1");
        let _field = otp_field(OtpFieldProps {
            request_focus: true,
            ..h.props(4)
        })
        .unwrap();

        clipboard::copy("234");
        dispatch(KeyboardEvent::with_modifiers("v", Modifiers::ctrl()));
        assert_eq!(h.code.get(), "1234");
        assert_eq!(h.filled.get(), 1);
    }

    #[test]
    fn test_enter_hides_keyboard() {
        setup();
        let _field = otp_field(OtpFieldProps {
            request_focus: true,
            ..Default::default()
        })
        .unwrap();
        assert!(keyboard_visible());
        press("Enter");
        assert!(!keyboard_visible());
    }

    #[test]
    fn test_read_only_rejects() {
        setup();
        let h = Harness::new("12");
        let field = otp_field(OtpFieldProps {
            read_only: true.into(),
            ..h.props(4)
        })
        .unwrap();
        assert_eq!(field.propose("123"), EditOutcome::Rejected(RejectReason::ReadOnly));
        assert!(h.changes.borrow().is_empty());
    }

    #[test]
    fn test_full_value_at_mount_does_not_fire() {
        setup();
        let h = Harness::new("1234");
        let field = otp_field(h.props(4)).unwrap();
        assert!(field.is_filled());
        assert_eq!(field.propose("1234"), EditOutcome::Unchanged);
        assert_eq!(h.filled.get(), 0);
    }

    #[test]
    fn test_resubmit_is_idempotent() {
        setup();
        let h = Harness::new("");
        let field = otp_field(h.props(2)).unwrap();
        assert_eq!(field.propose("12"), EditOutcome::Filled);
        assert_eq!(field.propose("12"), EditOutcome::Unchanged);
        assert_eq!(h.filled.get(), 1);
        assert_eq!(h.changes.borrow().len(), 1);
    }

    #[test]
    fn test_becoming_disabled_releases_focus() {
        setup();
        let enabled = signal(true);
        let field = otp_field(OtpFieldProps {
            request_focus: true,
            enabled: enabled.clone().into(),
            ..Default::default()
        })
        .unwrap();
        assert!(field.has_focus());

        enabled.set(false);
        let mut buffer = FrameBuffer::new(40, 6);
        let area = buffer.area();
        field.render(&mut buffer, area, Instant::now()).unwrap();
        assert!(!field.has_focus());
        assert!(!field.request_focus());
    }

    #[test]
    fn test_slots_follow_error_signal() {
        setup();
        let error = signal(None::<String>);
        let field = otp_field(OtpFieldProps {
            error_message: Some(error.clone().into()),
            helper_text: Some(Some("Sent to your phone".to_string()).into()),
            ..OtpFieldProps::new("12")
        })
        .unwrap();

        assert!(field.slots().iter().all(|(_, v)| v.state != SlotState::Error));
        assert_eq!(field.message().map(|m| m.kind), Some(MessageKind::Helper));

        error.set(Some("Invalid code".to_string()));
        assert!(field.slots().iter().all(|(_, v)| v.state == SlotState::Error));
        assert_eq!(field.message().map(|m| m.text), Some("Invalid code".to_string()));
    }

    #[test]
    fn test_render_draws_slots_and_message() {
        setup();
        let field = otp_field(OtpFieldProps {
            length: 4,
            mask: MaskingTransform::identity().into(),
            helper_text: Some(Some("hint".to_string()).into()),
            animate: false,
            ..OtpFieldProps::new("12")
        })
        .unwrap();

        let mut buffer = FrameBuffer::new(23, 5);
        let area = buffer.area();
        field.render(&mut buffer, area, Instant::now()).unwrap();

        assert_eq!(buffer.row_text(0), "╭───╮ ╭───╮ ╭───╮ ╭───╮");
        assert_eq!(buffer.row_text(1), "│ 1 │ │ 2 │ │   │ │   │");
        assert_eq!(buffer.row_text(2), "╰───╯ ╰───╯ ╰───╯ ╰───╯");
        assert_eq!(buffer.row_text(4).trim(), "hint");
        assert_eq!(buffer.get(0, 0).map(|c| c.fg), Some(t().primary()));
        assert_eq!(buffer.get(12, 0).map(|c| c.fg), Some(t().text_muted()));
    }

    #[test]
    fn test_render_obscures_by_default() {
        setup();
        let field = otp_field(OtpFieldProps {
            length: 2,
            animate: false,
            ..OtpFieldProps::new("73")
        })
        .unwrap();
        let mut buffer = FrameBuffer::new(11, 5);
        let area = buffer.area();
        field.render(&mut buffer, area, Instant::now()).unwrap();
        let row = buffer.row_text(1);
        assert!(!row.contains('7') && !row.contains('3'));
        assert_eq!(row.matches('•').count(), 2);
    }

    #[test]
    fn test_render_animates_new_digit() {
        setup();
        let code = signal(String::new());
        let field = otp_field(OtpFieldProps {
            length: 1,
            mask: MaskingTransform::identity().into(),
            ..OtpFieldProps::new(code.clone())
        })
        .unwrap();

        let start = Instant::now();
        let mut buffer = FrameBuffer::new(5, 5);
        let area = buffer.area();
        field.render(&mut buffer, area, start).unwrap();
        assert!(!field.is_animating(start));

        code.set("5".to_string());
        let mut buffer = FrameBuffer::new(5, 5);
        let area = buffer.area();
        field.render(&mut buffer, area, start).unwrap();
        assert!(field.is_animating(start));
        // Fully transparent at the first frame.
        assert_eq!(buffer.char_at(2, 1), Some(' '));

        let later = start + Duration::from_millis(500);
        let mut buffer = FrameBuffer::new(5, 5);
        let area = buffer.area();
        field.render(&mut buffer, area, later).unwrap();
        assert!(!field.is_animating(later));
        assert_eq!(buffer.char_at(2, 1), Some('5'));
    }

    #[test]
    fn test_render_places_caret_in_next_slot() {
        setup();
        let h = Harness::new("");
        let field = otp_field(OtpFieldProps {
            request_focus: true,
            animate: false,
            ..h.props(4)
        })
        .unwrap();

        let render = || {
            let mut buffer = FrameBuffer::new(23, 5);
            let area = buffer.area();
            field.render(&mut buffer, area, Instant::now()).unwrap();
            buffer.caret()
        };

        assert_eq!(render(), Some((2, 1)));
        type_digits("12");
        assert_eq!(render(), Some((14, 1)));

        // Enter dismisses the keyboard and with it the cursor.
        press("Enter");
        assert!(field.has_focus());
        assert_eq!(render(), None);
    }

    #[test]
    fn test_render_no_caret_without_focus() {
        setup();
        let field = otp_field(OtpFieldProps {
            animate: false,
            ..OtpFieldProps::new("1")
        })
        .unwrap();
        let mut buffer = FrameBuffer::new(23, 5);
        let area = buffer.area();
        field.render(&mut buffer, area, Instant::now()).unwrap();
        assert_eq!(buffer.caret(), None);
    }

    #[test]
    fn test_tab_moves_between_fields() {
        setup();
        let first = otp_field(OtpFieldProps {
            tab_index: Some(0),
            request_focus: true,
            ..Default::default()
        })
        .unwrap();
        let second = otp_field(OtpFieldProps {
            tab_index: Some(1),
            ..Default::default()
        })
        .unwrap();
        assert!(first.has_focus());
        focus::focus_next();
        assert!(second.has_focus());
        assert!(keyboard_visible());
    }
}
