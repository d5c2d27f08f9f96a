//! Slot Animation - Content transitions and color tweens.
//!
//! Every animation here is a pure function of an [`Instant`] supplied by the
//! caller, evaluated when a frame is drawn. Nothing ticks in the background;
//! the render loop redraws often enough for transitions to play.
//!
//! A slot that gains a character slides it in from half a content height
//! below while fading in. A slot that loses one slides it out upward while
//! fading out. Border and text colors tween toward their new values.
//!
//! ```ignore
//! use spark_otp::state::animate::SlotAnimation;
//!
//! let mut anim = SlotAnimation::new(border, text);
//! anim.observe("•", border, text, now, true);
//! let frame = anim.frame(now + Duration::from_millis(40));
//! ```

use std::time::{Duration, Instant};

use crate::types::Rgba;

/// Duration of a slot content transition.
pub const SLOT_TRANSITION: Duration = Duration::from_millis(150);

/// Duration of a border/text color tween.
pub const COLOR_TWEEN: Duration = Duration::from_millis(120);

/// Slide distance in content heights.
const SLIDE_DISTANCE: f32 = 0.5;

// =============================================================================
// Timing
// =============================================================================

/// Linear progress in `0.0..=1.0` of an animation that began at `start`.
pub fn progress(start: Instant, now: Instant, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}

pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

// =============================================================================
// Content Transition
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Content appearing in an empty slot.
    Enter,
    /// Content leaving a slot.
    Exit,
}

/// Position and opacity of slot content at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionFrame {
    /// Vertical offset in content heights. Positive is downward.
    pub offset: f32,
    /// 0.0 is invisible, 1.0 is fully drawn.
    pub opacity: f32,
}

impl TransitionFrame {
    pub const SETTLED: Self = Self {
        offset: 0.0,
        opacity: 1.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotTransition {
    pub direction: Direction,
    pub started: Instant,
    pub duration: Duration,
}

impl SlotTransition {
    pub fn new(direction: Direction, started: Instant) -> Self {
        Self {
            direction,
            started,
            duration: SLOT_TRANSITION,
        }
    }

    pub fn frame(&self, now: Instant) -> TransitionFrame {
        let t = ease_out_cubic(progress(self.started, now, self.duration));
        match self.direction {
            Direction::Enter => TransitionFrame {
                offset: SLIDE_DISTANCE * (1.0 - t),
                opacity: t,
            },
            Direction::Exit => TransitionFrame {
                offset: -SLIDE_DISTANCE * t,
                opacity: 1.0 - t,
            },
        }
    }

    pub fn is_done(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}

// =============================================================================
// Color Tween
// =============================================================================

/// A color moving from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorTween {
    from: Rgba,
    to: Rgba,
    started: Instant,
    duration: Duration,
}

impl ColorTween {
    /// A tween already at rest on `color`.
    pub fn settled(color: Rgba, now: Instant) -> Self {
        Self {
            from: color,
            to: color,
            started: now,
            duration: Duration::ZERO,
        }
    }

    pub fn at(&self, now: Instant) -> Rgba {
        let t = ease_out_cubic(progress(self.started, now, self.duration));
        Rgba::lerp(self.from, self.to, t)
    }

    pub fn target(&self) -> Rgba {
        self.to
    }

    /// Head toward `to`, starting from wherever the tween is at `now`.
    /// Retargeting to the current target keeps the tween running.
    pub fn retarget(&mut self, to: Rgba, now: Instant, animate: bool) {
        if to == self.to {
            return;
        }
        if animate {
            self.from = self.at(now);
            self.duration = COLOR_TWEEN;
        } else {
            self.from = to;
            self.duration = Duration::ZERO;
        }
        self.to = to;
        self.started = now;
    }
}

// =============================================================================
// Slot Animation
// =============================================================================

/// Glyph drawn for one slot at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphFrame {
    pub text: String,
    pub frame: TransitionFrame,
}

/// Everything needed to draw one slot at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotFrame {
    pub entering: Option<GlyphFrame>,
    pub leaving: Option<GlyphFrame>,
    pub border: Rgba,
    pub text: Rgba,
}

/// Animation state for a single slot across frames.
#[derive(Debug, Clone)]
pub struct SlotAnimation {
    shown: String,
    entering: Option<SlotTransition>,
    leaving: Option<(String, SlotTransition)>,
    border: ColorTween,
    text: ColorTween,
}

impl SlotAnimation {
    pub fn new(border: Rgba, text: Rgba, now: Instant) -> Self {
        Self {
            shown: String::new(),
            entering: None,
            leaving: None,
            border: ColorTween::settled(border, now),
            text: ColorTween::settled(text, now),
        }
    }

    /// Record what the slot should display now. Starts transitions when the
    /// content or colors differ from the last observation.
    pub fn observe(&mut self, content: &str, border: Rgba, text: Rgba, now: Instant, animate: bool) {
        if content != self.shown {
            if animate {
                self.leaving = (!self.shown.is_empty())
                    .then(|| (self.shown.clone(), SlotTransition::new(Direction::Exit, now)));
                self.entering = (!content.is_empty())
                    .then(|| SlotTransition::new(Direction::Enter, now));
            } else {
                self.leaving = None;
                self.entering = None;
            }
            self.shown = content.to_string();
        }
        self.border.retarget(border, now, animate);
        self.text.retarget(text, now, animate);
    }

    pub fn frame(&self, now: Instant) -> SlotFrame {
        let entering = (!self.shown.is_empty()).then(|| GlyphFrame {
            text: self.shown.clone(),
            frame: self
                .entering
                .filter(|t| !t.is_done(now))
                .map_or(TransitionFrame::SETTLED, |t| t.frame(now)),
        });
        let leaving = self
            .leaving
            .as_ref()
            .filter(|(_, t)| !t.is_done(now))
            .map(|(text, t)| GlyphFrame {
                text: text.clone(),
                frame: t.frame(now),
            });

        SlotFrame {
            entering,
            leaving,
            border: self.border.at(now),
            text: self.text.at(now),
        }
    }

    /// True while any transition or tween is still moving at `now`.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.entering.is_some_and(|t| !t.is_done(now))
            || self.leaving.as_ref().is_some_and(|(_, t)| !t.is_done(now))
            || self.border.at(now) != self.border.target()
            || self.text.at(now) != self.text.target()
    }
}
