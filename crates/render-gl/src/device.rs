use crate::convert::error_name;
use glow::HasContext;
use std::cell::Cell;

/// The loaded GL function table, shared by the instance and every resource so
/// resources can delete themselves on drop.
pub(crate) struct Device {
    pub gl: glow::Context,
    debug_graphics: bool,
    live_resources: Cell<usize>,
}

impl Device {
    pub fn new(gl: glow::Context, debug_graphics: bool) -> Self {
        Self {
            gl,
            debug_graphics,
            live_resources: Cell::new(0),
        }
    }

    /// In debug-graphics mode, drain and report pending GL errors raised by
    /// `call`.
    pub fn check(&self, call: &str) {
        if !self.debug_graphics {
            return;
        }
        loop {
            let code = unsafe { self.gl.get_error() };
            if code == glow::NO_ERROR {
                break;
            }
            tracing::error!(call, code, error = error_name(code), "OpenGL error");
        }
    }

    pub fn track(&self) {
        self.live_resources.set(self.live_resources.get() + 1);
    }

    pub fn untrack(&self) {
        self.live_resources.set(self.live_resources.get().saturating_sub(1));
    }

    pub fn live_resources(&self) -> usize {
        self.live_resources.get()
    }
}
