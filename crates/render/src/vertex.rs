use crate::buffer::Buffer;
use crate::format::Format;

/// Whether a vertex buffer advances per vertex or per instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InputRate {
    #[default]
    Vertex,
    Instance,
}

/// Attribute layout of one vertex buffer.
///
/// Attributes are tightly packed in declaration order. Across the layouts of a
/// vertex array object, attribute locations are numbered consecutively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VertexLayout {
    pub attributes: Vec<Format>,
    pub input_rate: InputRate,
}

impl VertexLayout {
    pub fn per_vertex(attributes: impl Into<Vec<Format>>) -> Self {
        Self {
            attributes: attributes.into(),
            input_rate: InputRate::Vertex,
        }
    }

    pub fn per_instance(attributes: impl Into<Vec<Format>>) -> Self {
        Self {
            attributes: attributes.into(),
            input_rate: InputRate::Instance,
        }
    }

    pub fn stride(&self) -> usize {
        self.attributes.iter().map(|f| f.size_in_bytes()).sum()
    }

    /// Byte offset of each attribute inside one element.
    pub fn offsets(&self) -> impl Iterator<Item = usize> + '_ {
        self.attributes.iter().scan(0, |offset, f| {
            let here = *offset;
            *offset += f.size_in_bytes();
            Some(here)
        })
    }
}

/// Vertex buffers with their layouts plus an optional 16-bit index buffer.
///
/// The VAO allocates and owns its buffers; fill them with
/// [`crate::CommandQueue::update_buffer`].
pub trait VertexArrayObject {
    type Buffer: Buffer;

    fn layouts(&self) -> &[VertexLayout];

    /// Element count of each vertex buffer, in layout order.
    fn vertex_counts(&self) -> &[usize];

    /// Number of `u16` indices, zero when there is no index buffer.
    fn index_count(&self) -> usize;

    fn vertex_buffer(&self, index: usize) -> &Self::Buffer;

    fn index_buffer(&self) -> Option<&Self::Buffer>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_and_offsets() {
        let layout = VertexLayout::per_vertex([Format::Float32x2, Format::Float32x4, Format::Unorm8x4]);
        assert_eq!(layout.stride(), 8 + 16 + 4);
        assert_eq!(layout.offsets().collect::<Vec<_>>(), vec![0, 8, 24]);
    }

    #[test]
    fn per_instance_layout() {
        let layout = VertexLayout::per_instance([Format::Float32x2]);
        assert_eq!(layout.input_rate, InputRate::Instance);
        assert_eq!(layout.stride(), 8);
    }
}
