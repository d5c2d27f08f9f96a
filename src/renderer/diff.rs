//! Differential renderer for fullscreen mode.
//!
//! Compares the current frame to the previous one and only writes cells that
//! changed. Output for a frame is queued into one buffer and flushed once,
//! wrapped in a synchronized update so the terminal never shows a half-drawn
//! frame.
//!
//! # Algorithm
//!
//! 1. Begin synchronized update
//! 2. For each cell: skip if unchanged from the previous frame, otherwise
//!    move (only when not already there), set changed style, print
//! 3. Show the cursor at the frame's caret, or hide it when there is none
//! 4. End synchronized update and flush
//! 5. Store the frame for the next comparison

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::queue;

use super::buffer::FrameBuffer;
use crate::types::{Attr, Cell, Rgba};

/// Style last sent to the terminal, so runs of same-styled cells are cheap.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PenState {
    fg: Rgba,
    bg: Rgba,
    attrs: Attr,
}

/// Differential renderer writing to any `Write` sink (stdout by default).
pub struct DiffRenderer<W: Write = io::Stdout> {
    out: W,
    previous: Option<FrameBuffer>,
    pen: Option<PenState>,
    cursor: Option<(u16, u16)>,
    /// Caret the terminal is currently showing (None: cursor hidden).
    shown_caret: Option<(u16, u16)>,
}

impl DiffRenderer<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for DiffRenderer<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> DiffRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            previous: None,
            pen: None,
            cursor: None,
            shown_caret: None,
        }
    }

    /// Render a frame, writing only changed cells.
    ///
    /// Returns true if any cells were changed.
    pub fn render(&mut self, buffer: &FrameBuffer) -> io::Result<bool> {
        let mut has_changes = false;

        queue!(self.out, BeginSynchronizedUpdate)?;
        self.pen = None;
        self.cursor = None;

        let width = buffer.width();
        let height = buffer.height();
        let comparable = self
            .previous
            .as_ref()
            .filter(|prev| prev.width() == width && prev.height() == height);

        for y in 0..height {
            for x in 0..width {
                let Some(cell) = buffer.get(x, y) else { continue };
                let changed = comparable
                    .and_then(|prev| prev.get(x, y))
                    .is_none_or(|prev_cell| !cells_equal(cell, prev_cell));

                if changed {
                    has_changes = true;
                    write_cell(&mut self.out, &mut self.pen, &mut self.cursor, x, y, cell)?;
                }
            }
        }

        queue!(self.out, SetAttribute(Attribute::Reset))?;

        // Printing cells moves the cursor, so a shown caret is restored after any change.
        let caret = buffer.caret();
        if caret != self.shown_caret || (has_changes && caret.is_some()) {
            match caret {
                Some((x, y)) => queue!(self.out, MoveTo(x, y), Show)?,
                None => queue!(self.out, Hide)?,
            }
            self.shown_caret = caret;
        }

        queue!(self.out, EndSynchronizedUpdate)?;
        self.out.flush()?;

        self.previous = Some(buffer.clone());
        Ok(has_changes)
    }

    /// Forget the previous frame; the next render redraws everything.
    /// Use after a resize.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Enter the alternate screen with a hidden cursor.
    pub fn enter_fullscreen(&mut self) -> io::Result<()> {
        queue!(self.out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        self.out.flush()?;
        self.shown_caret = None;
        self.invalidate();
        Ok(())
    }

    pub fn exit_fullscreen(&mut self) -> io::Result<()> {
        queue!(self.out, SetAttribute(Attribute::Reset), Show, LeaveAlternateScreen)?;
        self.out.flush()
    }

    /// The underlying writer, for inspecting output in tests.
    pub fn writer(&self) -> &W {
        &self.out
    }
}

fn write_cell<W: Write>(
    out: &mut W,
    pen: &mut Option<PenState>,
    cursor: &mut Option<(u16, u16)>,
    x: u16,
    y: u16,
    cell: &Cell,
) -> io::Result<()> {
    if *cursor != Some((x, y)) {
        queue!(out, MoveTo(x, y))?;
    }

    let wanted = PenState {
        fg: cell.fg,
        bg: cell.bg,
        attrs: cell.attrs,
    };
    if *pen != Some(wanted) {
        queue!(
            out,
            SetAttribute(Attribute::Reset),
            SetForegroundColor(cell.fg.to_crossterm()),
            SetBackgroundColor(cell.bg.to_crossterm())
        )?;
        for (flag, attribute) in [
            (Attr::BOLD, Attribute::Bold),
            (Attr::DIM, Attribute::Dim),
            (Attr::ITALIC, Attribute::Italic),
            (Attr::UNDERLINE, Attribute::Underlined),
        ] {
            if cell.attrs.contains(flag) {
                queue!(out, SetAttribute(attribute))?;
            }
        }
        *pen = Some(wanted);
    }

    let c = char::from_u32(cell.char).unwrap_or(' ');
    queue!(out, Print(c))?;
    *cursor = Some((x.saturating_add(1), y));
    Ok(())
}

/// Fast cell equality check.
#[inline]
fn cells_equal(a: &Cell, b: &Cell) -> bool {
    a.char == b.char && a.attrs == b.attrs && a.fg == b.fg && a.bg == b.bg
}
