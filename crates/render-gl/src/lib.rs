//! OpenGL 3.3 core render backend.
//!
//! Entry points are loaded through [`glow`] from a context the windowing layer
//! creates via [`GlWindow`]. Every command is issued immediately on the
//! calling thread and leaves the default bindings restored behind it.
//!
//! # Invariants
//! - The context stays current on the thread that created the instance.
//! - Resources delete their GL objects on drop and must be dropped before
//!   the instance; a leak is reported when the instance goes away.
//! - With `debug_graphics` set, `glGetError` is polled after every command
//!   and failures are logged.

mod bind;
mod convert;
mod device;
mod instance;
mod queue;
mod resource;
mod window;

pub use instance::GlRenderInstance;
pub use queue::GlCommandQueue;
pub use resource::{GlBuffer, GlPipeline, GlTexture, GlVertexArrayObject};
pub use window::{ContextAttributes, ContextError, GlWindow};

/// Bindings for the OpenGL backend.
pub type GlBindings<'a, W> = duskforge_render::Bindings<'a, GlRenderInstance<W>>;
