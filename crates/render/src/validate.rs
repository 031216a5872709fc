//! Checks shared by every backend.
//!
//! Each backend command calls the matching function here before issuing its
//! own device work. All checks are debug assertions: a failure is a caller
//! bug, fatal in debug builds and unchecked in release builds.

use crate::bindings::Bindings;
use crate::buffer::Buffer;
use crate::instance::RenderInstance;
use crate::pipeline::Pipeline;
use crate::texture::{Texture, TextureInfo};
use crate::vertex::{InputRate, VertexArrayObject, VertexLayout};

pub fn create_texture(info: &TextureInfo) {
    debug_assert!(
        info.format.is_texture_format(),
        "{:?} is not a texture format",
        info.format
    );
    debug_assert!(info.array_layers >= 1, "texture needs at least one layer");
}

pub fn create_vertex_array_object(buffer_element_counts: &[usize], layouts: &[VertexLayout]) {
    debug_assert_eq!(
        buffer_element_counts.len(),
        layouts.len(),
        "one element count is required per vertex layout"
    );
    debug_assert!(
        layouts
            .iter()
            .flat_map(|l| l.attributes.iter())
            .all(|f| f.is_vertex_format()),
        "vertex layouts may only contain vertex formats"
    );
}

pub fn draw<R: RenderInstance>(first_vertex: usize, vertex_count: usize, bindings: &Bindings<'_, R>) {
    draw_instances(first_vertex, vertex_count, 1, bindings);
}

pub fn draw_instances<R: RenderInstance>(
    first_vertex: usize,
    vertex_count: usize,
    instance_count: usize,
    bindings: &Bindings<'_, R>,
) {
    layouts_match(bindings);
    if vertex_count == 0 || instance_count == 0 {
        return;
    }
    let vao = bindings.vao;
    for (i, (layout, &count)) in vao.layouts().iter().zip(vao.vertex_counts()).enumerate() {
        match layout.input_rate {
            InputRate::Vertex => debug_assert!(
                first_vertex + vertex_count <= count,
                "vertices {first_vertex}..{} exceed buffer {i} holding {count}",
                first_vertex + vertex_count
            ),
            InputRate::Instance => debug_assert!(
                instance_count <= count,
                "{instance_count} instances exceed buffer {i} holding {count}"
            ),
        }
    }
}

pub fn draw_indexed<R: RenderInstance>(
    first_index: usize,
    vertex_count: usize,
    bindings: &Bindings<'_, R>,
) {
    layouts_match(bindings);
    if vertex_count == 0 {
        return;
    }
    let vao = bindings.vao;
    debug_assert!(
        vao.index_buffer().is_some(),
        "indexed draw on a vertex array object without an index buffer"
    );
    debug_assert!(
        first_index + vertex_count <= vao.index_count(),
        "indices {first_index}..{} exceed index buffer holding {}",
        first_index + vertex_count,
        vao.index_count()
    );
}

pub fn update_buffer(buffer: &impl Buffer, offset: usize, len: usize) {
    debug_assert!(
        offset + len <= buffer.size(),
        "write of {len} bytes at {offset} overflows buffer of {} bytes",
        buffer.size()
    );
}

pub fn texture_layer(texture: &impl Texture, layer: u32) {
    debug_assert!(
        layer < texture.array_layers(),
        "layer {layer} out of range for texture with {} layers",
        texture.array_layers()
    );
}

pub fn update_texture(texture: &impl Texture, layer: u32, len: usize) {
    texture_layer(texture, layer);
    debug_assert_eq!(
        len,
        texture.info().layer_size_in_bytes(),
        "texture upload must cover exactly one layer"
    );
}

/// Index values must address an existing vertex. Backends that fetch on the
/// CPU call this per index.
pub fn index_in_range(index: u16, vertex_count: usize) {
    debug_assert!(
        (index as usize) < vertex_count,
        "index {index} out of range for {vertex_count} vertices"
    );
}

fn layouts_match<R: RenderInstance>(bindings: &Bindings<'_, R>) {
    debug_assert_eq!(
        bindings.pipeline.descriptor().vertex_layouts.as_slice(),
        bindings.vao.layouts(),
        "pipeline '{}' expects different vertex layouts than the bound VAO",
        bindings.pipeline.descriptor().label
    );
}
