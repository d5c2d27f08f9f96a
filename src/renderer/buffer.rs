//! FrameBuffer - A grid of cells widgets draw into.
//!
//! Out-of-bounds writes are dropped, so widgets can draw partially
//! off-screen content without bounds checks of their own. A frame may also
//! carry a caret position where the terminal cursor is shown.

use crate::types::{Attr, BorderStyle, Cell, ClipRect, Rgba};

use crate::layout::char_width;

#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    caret: Option<(u16, u16)>,
}

impl FrameBuffer {
    /// Create a buffer filled with default (blank) cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
            caret: None,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// The whole buffer as a rectangle.
    pub fn area(&self) -> ClipRect {
        ClipRect::new(0, 0, self.width, self.height)
    }

    fn offset(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.offset(x, y).map(|i| &self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.offset(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Place the terminal cursor for this frame. Out-of-bounds positions are dropped.
    pub fn set_caret(&mut self, x: u16, y: u16) {
        if self.offset(x, y).is_some() {
            self.caret = Some((x, y));
        }
    }

    /// Where the cursor is shown, or None to keep it hidden.
    pub fn caret(&self) -> Option<(u16, u16)> {
        self.caret
    }

    /// Character at a position, for tests and debugging.
    pub fn char_at(&self, x: u16, y: u16) -> Option<char> {
        self.get(x, y).and_then(|c| char::from_u32(c.char))
    }

    /// Fill a rectangle with a background color.
    pub fn fill(&mut self, rect: ClipRect, bg: Rgba) {
        let Some(rect) = rect.intersect(&self.area()) else { return };
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                self.set(x, y, Cell { bg, ..Cell::default() });
            }
        }
    }

    /// Draw text starting at (x, y), clipped to `clip`. Wide characters take
    /// two cells; the second is blanked. Returns the width drawn.
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, fg: Rgba, attrs: Attr, clip: ClipRect) -> u16 {
        let mut col = x;
        for c in text.chars() {
            let w = char_width(c);
            if w == 0 {
                continue;
            }
            if clip.contains(col, y) {
                let bg = self.get(col, y).map_or(Rgba::TERMINAL_DEFAULT, |cell| cell.bg);
                self.set(col, y, Cell { char: c as u32, fg, bg, attrs });
                if w == 2 && clip.contains(col + 1, y) {
                    self.set(col + 1, y, Cell { char: ' ' as u32, fg, bg, attrs });
                }
            }
            col = col.saturating_add(w);
        }
        col - x
    }

    /// Draw a border around `rect`.
    pub fn draw_border(&mut self, rect: ClipRect, style: BorderStyle, color: Rgba) {
        if style == BorderStyle::None || rect.width < 2 || rect.height < 2 {
            return;
        }
        let (h, v, tl, tr, br, bl) = style.chars();
        let right = rect.x + rect.width - 1;
        let bottom = rect.y + rect.height - 1;

        let mut put = |x: u16, y: u16, c: char| {
            let bg = self.get(x, y).map_or(Rgba::TERMINAL_DEFAULT, |cell| cell.bg);
            self.set(x, y, Cell { char: c as u32, fg: color, bg, attrs: Attr::NONE });
        };

        for x in rect.x + 1..right {
            put(x, rect.y, h);
            put(x, bottom, h);
        }
        for y in rect.y + 1..bottom {
            put(rect.x, y, v);
            put(right, y, v);
        }
        put(rect.x, rect.y, tl);
        put(right, rect.y, tr);
        put(right, bottom, br);
        put(rect.x, bottom, bl);
    }

    /// Text of one row, for tests and debugging.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width).filter_map(|x| self.char_at(x, y)).collect()
    }
}
