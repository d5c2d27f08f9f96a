//! Text measurement for the message line.
//!
//! Cell widths come from the Unicode East Asian Width tables: wide CJK and
//! emoji take two cells, combining marks and control characters take none.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Width of a single character in terminal cells.
pub fn char_width(c: char) -> u16 {
    c.width().unwrap_or(0) as u16
}

/// Width of a string in terminal cells.
pub fn string_width(s: &str) -> u16 {
    u16::try_from(s.width()).unwrap_or(u16::MAX)
}

/// Fit `text` into `width` cells, ending in `…` when it had to be cut.
pub fn truncate_text(text: &str, width: u16) -> String {
    if string_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let target = width - 1;
    let mut result = String::new();
    let mut used = 0u16;
    for c in text.chars() {
        let w = char_width(c);
        if used + w > target {
            break;
        }
        result.push(c);
        used += w;
    }
    result.push('…');
    result
}
