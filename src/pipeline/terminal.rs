//! Terminal size signals.
//!
//! Root signals for the render loop: every frame is sized from these.

use spark_signals::{signal, Signal};

thread_local! {
    static TERMINAL_WIDTH: Signal<u16> = signal(80);
    static TERMINAL_HEIGHT: Signal<u16> = signal(24);
}

pub fn terminal_width() -> u16 {
    TERMINAL_WIDTH.with(|w| w.get())
}

pub fn terminal_height() -> u16 {
    TERMINAL_HEIGHT.with(|h| h.get())
}

/// Set the terminal size (called on resize events).
pub fn set_terminal_size(width: u16, height: u16) {
    TERMINAL_WIDTH.with(|w| w.set(width));
    TERMINAL_HEIGHT.with(|h| h.set(height));
}

/// Query crossterm for the real size. Keeps the previous size if the query
/// fails (not a tty).
pub fn detect_terminal_size() {
    if let Ok((width, height)) = crossterm::terminal::size() {
        set_terminal_size(width, height);
    }
}
