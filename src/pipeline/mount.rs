//! Mount API - Terminal lifecycle and frame loop.
//!
//! `mount` puts the terminal into raw mode on the alternate screen with
//! bracketed paste enabled, installs the global keys and draws the first
//! frame. Each `tick` routes at most one input event and redraws, so
//! time-based slot animations advance even without input.
//!
//! # Example
//!
//! ```ignore
//! use spark_otp::pipeline::{mount, run};
//!
//! let handle = mount(move |buffer, now| {
//!     let area = buffer.area();
//!     let _ = field.render(buffer, area, now);
//! })?;
//! run(&handle)?;  // Blocks until Ctrl+C or handle.stop()
//! handle.unmount();
//! ```

use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::{debug, warn};

use crate::error::Result;
use crate::renderer::{DiffRenderer, FrameBuffer};
use crate::state::{global_keys, input};
use super::terminal::{detect_terminal_size, terminal_height, terminal_width};

/// Frame poll interval (~60fps).
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Draws the whole screen for one frame.
pub type RootRender = Box<dyn FnMut(&mut FrameBuffer, Instant)>;

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by [`mount`].
///
/// Dropping it removes the global key handlers and restores the terminal.
pub struct MountHandle {
    running: Arc<AtomicBool>,
    global_keys: Option<global_keys::GlobalKeysHandle>,
    renderer: RefCell<DiffRenderer>,
    root: RefCell<RootRender>,
    last_size: Cell<(u16, u16)>,
}

impl MountHandle {
    /// Remove global keys and restore the terminal.
    pub fn unmount(self) {
        drop(self);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Request shutdown; the next `tick` returns false.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Draw one frame at `now`.
    pub fn draw(&self, now: Instant) -> Result<()> {
        let size = (terminal_width(), terminal_height());
        let mut renderer = self.renderer.borrow_mut();
        if self.last_size.replace(size) != size {
            debug!(width = size.0, height = size.1, "resize");
            renderer.invalidate();
        }

        let mut buffer = FrameBuffer::new(size.0, size.1);
        let mut root = self.root.borrow_mut();
        (&mut **root)(&mut buffer, now);
        renderer.render(&buffer)?;
        Ok(())
    }

    fn restore(&self) {
        if let Err(err) = input::disable_paste() {
            warn!(%err, "failed to disable bracketed paste");
        }
        if let Err(err) = self.renderer.borrow_mut().exit_fullscreen() {
            warn!(%err, "failed to leave alternate screen");
        }
        if let Err(err) = disable_raw_mode() {
            warn!(%err, "failed to disable raw mode");
        }
        debug!("terminal restored");
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.global_keys.take() {
            handle.cleanup();
        }
        self.restore();
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Mount a root render function on the terminal.
///
/// Sets up:
/// 1. Raw mode, alternate screen, bracketed paste
/// 2. Terminal size detection
/// 3. Global key handlers (Ctrl+C for shutdown, Tab/Shift+Tab for focus)
/// 4. The first frame
pub fn mount<F>(root: F) -> Result<MountHandle>
where
    F: FnMut(&mut FrameBuffer, Instant) + 'static,
{
    enable_raw_mode()?;
    detect_terminal_size();

    let running = Arc::new(AtomicBool::new(true));
    let handle = MountHandle {
        running: running.clone(),
        global_keys: Some(global_keys::setup_global_keys(running)),
        renderer: RefCell::new(DiffRenderer::new()),
        root: RefCell::new(Box::new(root)),
        last_size: Cell::new((terminal_width(), terminal_height())),
    };

    // From here on, Drop restores the terminal if a later step fails.
    handle.renderer.borrow_mut().enter_fullscreen()?;
    input::enable_paste()?;
    debug!(width = terminal_width(), height = terminal_height(), "mounted");

    handle.draw(Instant::now())?;
    Ok(handle)
}

/// Unmount and clean up.
pub fn unmount(handle: MountHandle) {
    handle.unmount();
}

// =============================================================================
// Event Loop
// =============================================================================

/// Route at most one pending event, then redraw.
///
/// * `Ok(true)` - Continue running
/// * `Ok(false)` - Stop requested (Ctrl+C pressed or `handle.stop()` called)
/// * `Err(e)` - Terminal I/O error
pub fn tick(handle: &MountHandle) -> Result<bool> {
    if !handle.is_running() {
        return Ok(false);
    }

    if let Some(event) = input::poll_event(FRAME_INTERVAL)? {
        input::route_event(event);
    }

    if handle.is_running() {
        handle.draw(Instant::now())?;
    }
    Ok(handle.is_running())
}

/// Run the event loop (blocking until stopped).
pub fn run(handle: &MountHandle) -> Result<()> {
    while tick(handle)? {}
    Ok(())
}
