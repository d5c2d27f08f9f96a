//! Renderer - Cell buffers and terminal output.
//!
//! Widgets draw into a [`FrameBuffer`]; the [`DiffRenderer`] writes only the
//! cells that changed since the previous frame.

mod buffer;
mod diff;

pub use buffer::FrameBuffer;
pub use diff::DiffRenderer;
