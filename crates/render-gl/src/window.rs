use duskforge_render::{MIN_BACKEND_VERSION, SwapInterval};
use std::ffi::c_void;

/// Context requested from the window. Always core profile, double-buffered,
/// at the engine's minimum version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextAttributes {
    pub major: u32,
    pub minor: u32,
    pub core_profile: bool,
    pub double_buffered: bool,
    /// Ask the driver for a debug context.
    pub debug: bool,
}

impl ContextAttributes {
    pub fn core(debug: bool) -> Self {
        Self {
            major: MIN_BACKEND_VERSION.major,
            minor: MIN_BACKEND_VERSION.minor,
            core_profile: true,
            double_buffered: true,
            debug,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("failed to create OpenGL {major}.{minor} context: {reason}")]
    Creation { major: u32, minor: u32, reason: String },
    #[error("swap interval {interval:?} not supported: {reason}")]
    SwapInterval {
        interval: SwapInterval,
        reason: String,
    },
}

/// What the OpenGL backend needs from the window it renders into.
///
/// Implemented by the windowing layer (SDL, glutin, ...). The context created
/// here is made current on the calling thread and stays current for the life
/// of the render instance.
pub trait GlWindow {
    fn create_context(&mut self, attributes: &ContextAttributes) -> Result<(), ContextError>;

    /// Address of a GL entry point, or null when it cannot be resolved.
    fn get_proc_address(&self, symbol: &str) -> *const c_void;

    fn set_swap_interval(&mut self, interval: SwapInterval) -> Result<(), ContextError>;

    fn swap_buffers(&self);

    /// Size of the default framebuffer in pixels.
    fn drawable_size(&self) -> (u32, u32);

    fn destroy_context(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_attributes_request_the_version_floor() {
        let attributes = ContextAttributes::core(false);
        assert_eq!((attributes.major, attributes.minor), (3, 3));
        assert!(attributes.core_profile);
        assert!(attributes.double_buffered);
        assert!(!attributes.debug);
    }

    #[test]
    fn context_error_names_the_version() {
        let err = ContextError::Creation {
            major: 3,
            minor: 3,
            reason: "no display".into(),
        };
        assert_eq!(err.to_string(), "failed to create OpenGL 3.3 context: no display");
    }
}
