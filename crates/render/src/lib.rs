//! Render abstraction: backend-agnostic resources and command submission.
//!
//! A [`RenderInstance`] owns one backend device and creates buffers, textures,
//! vertex array objects, pipelines and command queues. Game code only names
//! the trait; each backend crate provides one implementation.
//!
//! # Invariants
//! - A queue only accepts resources of its own backend (enforced by types).
//! - Commands reach the device in call order, one at a time.
//! - All mutation of device-visible state goes through [`CommandQueue`].
//! - Environment failures abort through [`fatal`]; contract violations are
//!   debug assertions in [`validate`]. Nothing returns a recoverable error.

mod bindings;
mod buffer;
mod config;
pub mod fatal;
mod format;
mod instance;
mod pipeline;
pub mod shaders;
mod texture;
pub mod validate;
mod vertex;

pub use bindings::{Bindings, MAX_TEXTURE_SLOTS, MAX_UNIFORM_SLOTS};
pub use buffer::Buffer;
pub use config::{RenderConfig, SwapInterval};
pub use fatal::fatal;
pub use format::{Color, Filter, Format};
pub use instance::{
    BackendInfo, BackendVersion, CommandQueue, MIN_BACKEND_VERSION, RenderInstance,
    UnsupportedVersion, check_version,
};
pub use pipeline::{BlendMode, Pipeline, PipelineDescriptor};
pub use texture::{Texture, TextureInfo};
pub use vertex::{InputRate, VertexArrayObject, VertexLayout};

pub fn crate_info() -> &'static str {
    "duskforge-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
