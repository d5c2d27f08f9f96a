//! Core types for spark-otp.
//!
//! Colors, cell attributes and the cell grid primitives the renderer draws
//! with. Everything the widget computes ends up as one of these.

use crossterm::style::Color as CrosstermColor;

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Channels are integers so colors compare exactly.
/// Special markers: r=-1 is the terminal default, r=-2 is an ANSI palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: i16,
    pub g: i16,
    pub b: i16,
    pub a: i16,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as i16,
            g: g as i16,
            b: b as i16,
            a: a as i16,
        }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Terminal default color (let terminal decide).
    pub const TERMINAL_DEFAULT: Self = Self { r: -1, g: -1, b: -1, a: -1 };

    /// Fully transparent.
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, a: 0 };

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// ANSI palette color (0-255), stored as r=-2, g=index.
    pub const fn ansi(index: u8) -> Self {
        Self { r: -2, g: index as i16, b: 0, a: 255 }
    }

    #[inline]
    pub const fn is_terminal_default(&self) -> bool {
        self.r == -1
    }

    #[inline]
    pub const fn is_ansi(&self) -> bool {
        self.r == -2
    }

    /// ANSI palette index. Only meaningful when `is_ansi()`.
    #[inline]
    pub const fn ansi_index(&self) -> u8 {
        self.g as u8
    }

    /// Create from a packed 0xRRGGBB integer.
    pub const fn from_rgb_int(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xFF) as u8,
            ((rgb >> 8) & 0xFF) as u8,
            (rgb & 0xFF) as u8,
        )
    }

    /// Linear interpolation between two colors.
    ///
    /// Special colors (terminal default, ANSI) cannot be mixed: the result
    /// snaps to whichever end `t` is closer to.
    pub fn lerp(a: Self, b: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        if a.r < 0 || b.r < 0 {
            return if t < 0.5 { a } else { b };
        }
        let inv_t = 1.0 - t;
        let mix = |x: i16, y: i16| ((x as f32 * inv_t) + (y as f32 * t)).round() as i16;

        Self {
            r: mix(a.r, b.r),
            g: mix(a.g, b.g),
            b: mix(a.b, b.b),
            a: mix(a.a, b.a),
        }
    }

    /// Dim the color by a factor (0.0 = black, 1.0 = unchanged).
    pub fn dim(self, factor: f32) -> Self {
        if self.is_terminal_default() {
            return Self::GRAY;
        }
        if self.is_ansi() {
            return self;
        }
        let scale = |c: i16| (c as f32 * factor).clamp(0.0, 255.0) as i16;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
            a: self.a,
        }
    }

    /// Parse a hex color (`#RGB`, `#RRGGBB`, `#RRGGBBAA`, `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

        match hex.len() {
            3 => {
                let mut channels = hex.chars().filter_map(|c| c.to_digit(16)).map(|d| (d * 17) as u8);
                Some(Self::rgb(channels.next()?, channels.next()?, channels.next()?))
            }
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// Parse a color string: hex or one of the keywords
    /// `transparent` / `default`.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        match input.to_lowercase().as_str() {
            "transparent" => Some(Self::TRANSPARENT),
            "default" | "inherit" => Some(Self::TERMINAL_DEFAULT),
            _ => Self::from_hex(input),
        }
    }

    /// Convert to the crossterm color used for output.
    pub fn to_crossterm(self) -> CrosstermColor {
        if self.is_terminal_default() {
            CrosstermColor::Reset
        } else if self.is_ansi() {
            CrosstermColor::AnsiValue(self.ansi_index())
        } else {
            CrosstermColor::Rgb {
                r: self.r.clamp(0, 255) as u8,
                g: self.g.clamp(0, 255) as u8,
                b: self.b.clamp(0, 255) as u8,
            }
        }
    }
}

// =============================================================================
// Cell Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::DIM`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
    }
}

// =============================================================================
// Cell
// =============================================================================

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Unicode codepoint (32 for space).
    pub char: u32,
    pub fg: Rgba,
    pub bg: Rgba,
    pub attrs: Attr,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            char: b' ' as u32,
            fg: Rgba::TERMINAL_DEFAULT,
            bg: Rgba::TERMINAL_DEFAULT,
            attrs: Attr::NONE,
        }
    }
}

// =============================================================================
// ClipRect
// =============================================================================

/// A rectangle of cells. Widgets render into one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClipRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl ClipRect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Check if a point is inside this rectangle.
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && y >= self.y
            && (x as u32) < self.x as u32 + self.width as u32
            && (y as u32) < self.y as u32 + self.height as u32
    }

    /// Intersection of two rectangles, `None` if they don't overlap.
    pub fn intersect(&self, other: &ClipRect) -> Option<ClipRect> {
        let x1 = self.x.max(other.x) as u32;
        let y1 = self.y.max(other.y) as u32;
        let x2 = (self.x as u32 + self.width as u32).min(other.x as u32 + other.width as u32);
        let y2 = (self.y as u32 + self.height as u32).min(other.y as u32 + other.height as u32);

        if x2 > x1 && y2 > y1 {
            Some(ClipRect::new(x1 as u16, y1 as u16, (x2 - x1) as u16, (y2 - y1) as u16))
        } else {
            None
        }
    }
}

// =============================================================================
// Border Styles
// =============================================================================

/// Box border styles used for slot outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum BorderStyle {
    #[default]
    None = 0,
    /// ─ │ ┌ ┐ └ ┘
    Single = 1,
    /// ═ ║ ╔ ╗ ╚ ╝
    Double = 2,
    /// ─ │ ╭ ╮ ╰ ╯
    Rounded = 3,
    /// ━ ┃ ┏ ┓ ┗ ┛
    Bold = 4,
    /// - | + + + +
    Ascii = 5,
}

impl BorderStyle {
    /// Border characters for this style.
    ///
    /// Returns: (horizontal, vertical, top_left, top_right, bottom_right, bottom_left)
    pub const fn chars(&self) -> (char, char, char, char, char, char) {
        match self {
            Self::None => (' ', ' ', ' ', ' ', ' ', ' '),
            Self::Single => ('─', '│', '┌', '┐', '┘', '└'),
            Self::Double => ('═', '║', '╔', '╗', '╝', '╚'),
            Self::Rounded => ('─', '│', '╭', '╮', '╯', '╰'),
            Self::Bold => ('━', '┃', '┏', '┓', '┛', '┗'),
            Self::Ascii => ('-', '|', '+', '+', '+', '+'),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
