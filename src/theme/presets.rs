//! Theme presets.
//!
//! - terminal (default, ANSI colors)
//! - dracula
//! - nord
//! - gruvbox
//! - tokyo-night

use super::{Theme, ThemeColor};
use crate::types::Rgba;

/// Terminal theme - uses ANSI colors to respect the user's terminal theme.
pub fn terminal() -> Theme {
    Theme {
        name: "terminal".to_string(),
        description: "Uses terminal default colors".to_string(),
        primary: ThemeColor::Ansi(12), // bright blue
        error: ThemeColor::Ansi(1),    // red
        success: ThemeColor::Ansi(2),  // green
        text: ThemeColor::Default,
        text_muted: ThemeColor::Ansi(8),
        text_disabled: ThemeColor::Ansi(8),
        background: ThemeColor::Default,
        border: ThemeColor::Ansi(7),
    }
}

pub fn dracula() -> Theme {
    Theme {
        name: "dracula".to_string(),
        description: "Dracula dark theme".to_string(),
        primary: ThemeColor::Rgb(Rgba::from_rgb_int(0xbd93f9)),
        error: ThemeColor::Rgb(Rgba::from_rgb_int(0xff5555)),
        success: ThemeColor::Rgb(Rgba::from_rgb_int(0x50fa7b)),
        text: ThemeColor::Rgb(Rgba::from_rgb_int(0xf8f8f2)),
        text_muted: ThemeColor::Rgb(Rgba::from_rgb_int(0x6272a4)),
        text_disabled: ThemeColor::Rgb(Rgba::from_rgb_int(0x44475a)),
        background: ThemeColor::Rgb(Rgba::from_rgb_int(0x282a36)),
        border: ThemeColor::Rgb(Rgba::from_rgb_int(0x6272a4)),
    }
}

/// Nord - arctic, bluish colors.
pub fn nord() -> Theme {
    Theme {
        name: "nord".to_string(),
        description: "Nord arctic theme".to_string(),
        primary: ThemeColor::Str("#88c0d0".to_string()), // frost cyan
        error: ThemeColor::Str("#bf616a".to_string()),   // aurora red
        success: ThemeColor::Str("#a3be8c".to_string()), // aurora green
        text: ThemeColor::Rgb(Rgba::from_rgb_int(0xd8dee9)),
        text_muted: ThemeColor::Rgb(Rgba::from_rgb_int(0x4c566a)),
        text_disabled: ThemeColor::Rgb(Rgba::from_rgb_int(0x3b4252)),
        background: ThemeColor::Rgb(Rgba::from_rgb_int(0x2e3440)),
        border: ThemeColor::Rgb(Rgba::from_rgb_int(0x4c566a)),
    }
}

pub fn gruvbox() -> Theme {
    Theme {
        name: "gruvbox".to_string(),
        description: "Gruvbox retro groove theme".to_string(),
        primary: ThemeColor::Str("#fabd2f".to_string()),
        error: ThemeColor::Str("#fb4934".to_string()),
        success: ThemeColor::Str("#b8bb26".to_string()),
        text: ThemeColor::Rgb(Rgba::from_rgb_int(0xebdbb2)),
        text_muted: ThemeColor::Rgb(Rgba::from_rgb_int(0x928374)),
        text_disabled: ThemeColor::Rgb(Rgba::from_rgb_int(0x504945)),
        background: ThemeColor::Rgb(Rgba::from_rgb_int(0x282828)),
        border: ThemeColor::Rgb(Rgba::from_rgb_int(0x665c54)),
    }
}

pub fn tokyo_night() -> Theme {
    Theme {
        name: "tokyo-night".to_string(),
        description: "Tokyo Night dark theme".to_string(),
        primary: ThemeColor::Str("#7aa2f7".to_string()),
        error: ThemeColor::Str("#f7768e".to_string()),
        success: ThemeColor::Str("#9ece6a".to_string()),
        text: ThemeColor::Rgb(Rgba::from_rgb_int(0xc0caf5)),
        text_muted: ThemeColor::Rgb(Rgba::from_rgb_int(0x565f89)),
        text_disabled: ThemeColor::Rgb(Rgba::from_rgb_int(0x414868)),
        background: ThemeColor::Rgb(Rgba::from_rgb_int(0x1a1b26)),
        border: ThemeColor::Rgb(Rgba::from_rgb_int(0x414868)),
    }
}

/// Look up a preset by name. Accepts `snake_case` and `kebab-case` spellings.
pub fn get_preset(name: &str) -> Option<Theme> {
    match name.trim().to_lowercase().replace('_', "-").as_str() {
        "terminal" => Some(terminal()),
        "dracula" => Some(dracula()),
        "nord" => Some(nord()),
        "gruvbox" => Some(gruvbox()),
        "tokyo-night" | "tokyonight" => Some(tokyo_night()),
        _ => None,
    }
}

pub fn preset_names() -> &'static [&'static str] {
    &["terminal", "dracula", "nord", "gruvbox", "tokyo-night"]
}
