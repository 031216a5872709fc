use crate::bindings::Bindings;
use crate::buffer::Buffer;
use crate::format::Color;
use crate::pipeline::{Pipeline, PipelineDescriptor};
use crate::texture::{Texture, TextureInfo};
use crate::vertex::{VertexArrayObject, VertexLayout};
use std::fmt;

/// Lowest backend API version the engine runs on.
pub const MIN_BACKEND_VERSION: BackendVersion = BackendVersion::new(3, 3);

/// `major.minor` version reported by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BackendVersion {
    pub major: u32,
    pub minor: u32,
}

impl BackendVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for BackendVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// The backend reports a version below [`MIN_BACKEND_VERSION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("minimum OpenGL version is {required}, found {found}")]
pub struct UnsupportedVersion {
    pub required: BackendVersion,
    pub found: BackendVersion,
}

/// Check `found` against the engine's version floor.
pub fn check_version(found: BackendVersion) -> Result<(), UnsupportedVersion> {
    if found < MIN_BACKEND_VERSION {
        return Err(UnsupportedVersion {
            required: MIN_BACKEND_VERSION,
            found,
        });
    }
    Ok(())
}

/// Name and version of the backend behind a [`RenderInstance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendInfo {
    pub name: &'static str,
    pub version: BackendVersion,
    /// Driver-reported renderer string, when the backend has one.
    pub renderer: String,
}

/// Owner of a backend device and factory for everything drawn with it.
///
/// One instance exists per window. Every resource type and the command queue
/// are associated types, so a queue only ever accepts resources created by the
/// same backend. Resources must be dropped before the instance; this is a
/// caller contract and is not checked at runtime.
pub trait RenderInstance: Sized {
    type Buffer: Buffer;
    type Texture: Texture;
    type VertexArrayObject: VertexArrayObject<Buffer = Self::Buffer>;
    type Pipeline: Pipeline;
    type CommandQueue<'a>: CommandQueue<Self>
    where
        Self: 'a;

    fn backend_info(&self) -> BackendInfo;

    /// Size in pixels of the default framebuffer.
    fn drawable_size(&self) -> (u32, u32);

    /// Allocate a buffer of `size_in_bytes`. Contents are undefined until
    /// written through a command queue.
    fn create_buffer(&self, size_in_bytes: usize) -> Self::Buffer;

    fn create_texture(&self, info: &TextureInfo) -> Self::Texture;

    /// Allocate one vertex buffer per layout, sized for the matching entry of
    /// `buffer_element_counts`, plus an index buffer for `index_count` `u16`
    /// indices when `index_count` is non-zero.
    fn create_vertex_array_object(
        &self,
        buffer_element_counts: &[usize],
        layouts: &[VertexLayout],
        index_count: usize,
    ) -> Self::VertexArrayObject;

    fn create_pipeline(&self, descriptor: &PipelineDescriptor) -> Self::Pipeline;

    fn create_command_queue(&self) -> Self::CommandQueue<'_>;
}

/// Ordered submission of clears, uploads, draws and presents.
///
/// Commands reach the device in call order and are never reordered or batched
/// across calls. Every draw is a triangle list. Contract violations (ranges,
/// mismatched layouts) are debug assertions in [`crate::validate`], which each
/// backend runs before its own body.
pub trait CommandQueue<R: RenderInstance> {
    /// Fill every texel of mip 0 of every layer of `texture` with `color`.
    fn clear_texture(&mut self, texture: &R::Texture, color: Color);

    /// Fill the default framebuffer with `color`.
    fn clear_framebuffer(&mut self, color: Color);

    fn update_buffer(&mut self, buffer: &R::Buffer, offset: usize, data: &[u8]);

    /// Replace the full contents of one layer. `data` is tightly packed in the
    /// texture's format.
    fn update_texture(&mut self, texture: &R::Texture, layer: u32, data: &[u8]);

    /// Read back one full layer, tightly packed in the texture's format.
    fn read_texture(&mut self, texture: &R::Texture, layer: u32) -> Vec<u8>;

    fn draw(&mut self, first_vertex: usize, vertex_count: usize, bindings: &Bindings<'_, R>);

    /// Draw `vertex_count` vertices fetched through the VAO's `u16` index
    /// buffer, starting at index `first_index`.
    fn draw_indexed(&mut self, first_index: usize, vertex_count: usize, bindings: &Bindings<'_, R>);

    fn draw_instances(
        &mut self,
        first_vertex: usize,
        vertex_count: usize,
        instance_count: usize,
        bindings: &Bindings<'_, R>,
    );

    /// Show the default framebuffer. May block on vsync, depending on
    /// [`crate::RenderConfig`].
    fn present(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_floor_accepts_three_three_and_above() {
        assert!(check_version(BackendVersion::new(3, 3)).is_ok());
        assert!(check_version(BackendVersion::new(4, 1)).is_ok());
        assert!(check_version(BackendVersion::new(4, 0)).is_ok());
    }

    #[test]
    fn version_floor_rejects_three_two_with_diagnostic() {
        let err = check_version(BackendVersion::new(3, 2)).unwrap_err();
        assert_eq!(err.required, BackendVersion::new(3, 3));
        assert_eq!(err.found, BackendVersion::new(3, 2));
        let message = err.to_string();
        assert!(message.contains("3.3"));
        assert!(message.contains("3.2"));
    }

    #[test]
    fn version_ordering_is_major_then_minor() {
        assert!(BackendVersion::new(2, 9) < BackendVersion::new(3, 0));
        assert!(BackendVersion::new(3, 10) > BackendVersion::new(3, 3));
    }
}
