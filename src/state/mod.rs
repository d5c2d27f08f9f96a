//! State Module - Runtime state management systems
//!
//! - **Focus** - Tab cycling, callbacks, focus requesters
//! - **Keyboard** - Event types, dispatch, handler registry, soft keyboard
//! - **Input** - crossterm event conversion and routing
//! - **Global keys** - Ctrl+C, Tab, Shift+Tab
//! - **Clipboard** - Internal buffer behind Ctrl+V
//! - **Animate** - Slot transitions and color tweens

pub mod animate;
pub mod clipboard;
pub mod global_keys;
pub mod focus;
pub mod input;
pub mod keyboard;

pub use focus::*;
pub use keyboard::*;
