//! Pipeline - Hosting widgets on a real terminal.
//!
//! ```text
//! input event → keyboard dispatch → widget callbacks → root render → FrameBuffer → DiffRenderer
//! ```
//!
//! Widgets are not stored here. The caller mounts one root render closure
//! that draws everything for a frame; `tick` routes input and redraws.

pub mod mount;
pub mod terminal;

pub use mount::{mount, run, tick, unmount, MountHandle, RootRender};
pub use terminal::{detect_terminal_size, set_terminal_size, terminal_height, terminal_width};
