//! Theme System for spark-otp.
//!
//! Semantic color tokens the OTP field reads: `primary` for occupied slot
//! borders, `error` for the error state, the `text*` family for glyphs,
//! helper text and disabled slots. Colors may be ANSI palette entries (so the
//! terminal theme is respected), explicit RGB, or hex strings.
//!
//! The active theme lives in a thread-local signal; [`t()`] reads it.
//!
//! # Example
//!
//! ```ignore
//! use spark_otp::theme::{set_theme, get_preset, t};
//!
//! set_theme(get_preset("nord").unwrap());
//! let border = t().primary();
//! ```

use spark_signals::{signal, Signal};
use tracing::debug;

use crate::types::Rgba;

pub mod presets;

pub use presets::*;

// =============================================================================
// ThemeColor - A color that can be ANSI, RGB, or string
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ThemeColor {
    /// Use terminal's default color.
    #[default]
    Default,
    /// ANSI palette index (0-255).
    Ansi(u8),
    Rgb(Rgba),
    /// Hex string or keyword, parsed on resolve.
    Str(String),
}

impl ThemeColor {
    /// Resolve to Rgba. Unparseable strings resolve to magenta so they are
    /// easy to spot on screen.
    pub fn resolve(&self) -> Rgba {
        match self {
            Self::Default => Rgba::TERMINAL_DEFAULT,
            Self::Ansi(i) => Rgba::ansi(*i),
            Self::Rgb(c) => *c,
            Self::Str(s) => Rgba::parse(s).unwrap_or(Rgba::MAGENTA),
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }
}

/// `u8` is an ANSI index.
impl From<u8> for ThemeColor {
    fn from(index: u8) -> Self {
        Self::Ansi(index)
    }
}

impl From<Rgba> for ThemeColor {
    fn from(color: Rgba) -> Self {
        Self::Rgb(color)
    }
}

/// `&str` is a string to parse.
impl From<&str> for ThemeColor {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

/// `u32` is an RGB integer (0xRRGGBB).
impl From<u32> for ThemeColor {
    fn from(rgb: u32) -> Self {
        Self::Rgb(Rgba::from_rgb_int(rgb))
    }
}

// =============================================================================
// Theme
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub description: String,

    /// Occupied slot borders.
    pub primary: ThemeColor,
    pub error: ThemeColor,
    pub success: ThemeColor,

    pub text: ThemeColor,
    /// Empty slot borders.
    pub text_muted: ThemeColor,
    /// Disabled slot borders.
    pub text_disabled: ThemeColor,

    pub background: ThemeColor,
    pub border: ThemeColor,
}

impl Default for Theme {
    fn default() -> Self {
        terminal()
    }
}

impl Theme {
    /// Create a new theme with all default colors.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            primary: ThemeColor::Default,
            error: ThemeColor::Default,
            success: ThemeColor::Default,
            text: ThemeColor::Default,
            text_muted: ThemeColor::Default,
            text_disabled: ThemeColor::Default,
            background: ThemeColor::Default,
            border: ThemeColor::Default,
        }
    }
}

// =============================================================================
// Active Theme
// =============================================================================

thread_local! {
    static ACTIVE_THEME: Signal<Theme> = signal(terminal());
}

pub fn set_theme(theme: Theme) {
    debug!(theme = %theme.name, "set theme");
    ACTIVE_THEME.with(|s| s.set(theme));
}

/// Switch to a preset by name. Returns false for unknown names.
pub fn set_theme_by_name(name: &str) -> bool {
    match get_preset(name) {
        Some(theme) => {
            set_theme(theme);
            true
        }
        None => false,
    }
}

pub fn active_theme() -> Theme {
    ACTIVE_THEME.with(|s| s.get())
}

/// Reset to the terminal theme (for testing).
pub fn reset_theme() {
    ACTIVE_THEME.with(|s| s.set(terminal()));
}

// =============================================================================
// Accessor
// =============================================================================

/// Resolved colors of the active theme.
///
/// ```ignore
/// let error = t().error();
/// ```
#[derive(Debug, Clone)]
pub struct ThemeAccessor {
    theme: Theme,
}

impl ThemeAccessor {
    pub fn primary(&self) -> Rgba {
        self.theme.primary.resolve()
    }

    pub fn error(&self) -> Rgba {
        self.theme.error.resolve()
    }

    pub fn success(&self) -> Rgba {
        self.theme.success.resolve()
    }

    pub fn text(&self) -> Rgba {
        self.theme.text.resolve()
    }

    pub fn text_muted(&self) -> Rgba {
        self.theme.text_muted.resolve()
    }

    pub fn text_disabled(&self) -> Rgba {
        self.theme.text_disabled.resolve()
    }

    pub fn background(&self) -> Rgba {
        self.theme.background.resolve()
    }

    pub fn border(&self) -> Rgba {
        self.theme.border.resolve()
    }
}

/// Snapshot accessor for the active theme.
pub fn t() -> ThemeAccessor {
    ThemeAccessor {
        theme: active_theme(),
    }
}
