use duskforge_render::{
    Buffer, Pipeline, PipelineDescriptor, Texture, TextureInfo, VertexArrayObject, VertexLayout,
};
use std::cell::RefCell;

/// Host memory standing in for a device buffer. Zero-filled on creation.
#[derive(Debug)]
pub struct SoftBuffer {
    pub(crate) data: RefCell<Vec<u8>>,
}

impl SoftBuffer {
    pub(crate) fn new(size_in_bytes: usize) -> Self {
        Self {
            data: RefCell::new(vec![0; size_in_bytes]),
        }
    }

    /// Copy of the current contents.
    pub fn contents(&self) -> Vec<u8> {
        self.data.borrow().clone()
    }
}

impl Buffer for SoftBuffer {
    fn size(&self) -> usize {
        self.data.borrow().len()
    }
}

/// Texture storage: one tightly packed byte vector per layer.
#[derive(Debug)]
pub struct SoftTexture {
    pub(crate) info: TextureInfo,
    pub(crate) layers: RefCell<Vec<Vec<u8>>>,
}

impl SoftTexture {
    pub(crate) fn new(info: TextureInfo) -> Self {
        let layer = vec![0; info.layer_size_in_bytes()];
        Self {
            info,
            layers: RefCell::new(vec![layer; info.array_layers as usize]),
        }
    }
}

impl Texture for SoftTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }
}

#[derive(Debug)]
pub struct SoftVertexArrayObject {
    pub(crate) layouts: Vec<VertexLayout>,
    pub(crate) counts: Vec<usize>,
    pub(crate) buffers: Vec<SoftBuffer>,
    pub(crate) index_count: usize,
    pub(crate) index_buffer: Option<SoftBuffer>,
}

impl SoftVertexArrayObject {
    pub(crate) fn new(counts: &[usize], layouts: &[VertexLayout], index_count: usize) -> Self {
        let buffers = counts
            .iter()
            .zip(layouts)
            .map(|(count, layout)| SoftBuffer::new(count * layout.stride()))
            .collect();
        Self {
            layouts: layouts.to_vec(),
            counts: counts.to_vec(),
            buffers,
            index_count,
            index_buffer: (index_count > 0).then(|| SoftBuffer::new(index_count * 2)),
        }
    }
}

impl VertexArrayObject for SoftVertexArrayObject {
    type Buffer = SoftBuffer;

    fn layouts(&self) -> &[VertexLayout] {
        &self.layouts
    }

    fn vertex_counts(&self) -> &[usize] {
        &self.counts
    }

    fn index_count(&self) -> usize {
        self.index_count
    }

    fn vertex_buffer(&self, index: usize) -> &SoftBuffer {
        &self.buffers[index]
    }

    fn index_buffer(&self) -> Option<&SoftBuffer> {
        self.index_buffer.as_ref()
    }
}

/// Pipeline state. The GLSL sources are kept for inspection only; the
/// rasterizer runs its built-in program.
#[derive(Debug)]
pub struct SoftPipeline {
    pub(crate) descriptor: PipelineDescriptor,
}

impl Pipeline for SoftPipeline {
    fn descriptor(&self) -> &PipelineDescriptor {
        &self.descriptor
    }
}
