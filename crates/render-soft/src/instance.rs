use crate::queue::SoftCommandQueue;
use crate::record::{RecordedCommand, SoftStats};
use crate::resource::{SoftBuffer, SoftPipeline, SoftTexture, SoftVertexArrayObject};
use crate::surface::Surface;
use duskforge_render::{
    BackendInfo, BackendVersion, MIN_BACKEND_VERSION, PipelineDescriptor, RenderConfig,
    RenderInstance, TextureInfo, VertexLayout, validate,
};
use std::cell::{Cell, RefCell};

/// Render instance backed by host memory.
///
/// Draws land in a back buffer; `present` copies it to the front buffer.
/// Every command is appended to a log that tests and tools can inspect.
#[derive(Debug)]
pub struct SoftRenderInstance {
    config: RenderConfig,
    pub(crate) back: RefCell<Surface>,
    pub(crate) front: RefCell<Surface>,
    pub(crate) log: RefCell<Vec<RecordedCommand>>,
    pub(crate) stats: Cell<SoftStats>,
}

impl SoftRenderInstance {
    /// Version this backend reports. Always meets the engine floor.
    pub const VERSION: BackendVersion = MIN_BACKEND_VERSION;

    pub fn new(width: u32, height: u32, config: &RenderConfig) -> Self {
        tracing::info!(
            width,
            height,
            swap_interval = ?config.swap_interval(),
            "software render instance created"
        );
        Self {
            config: *config,
            back: RefCell::new(Surface::new(width, height)),
            front: RefCell::new(Surface::new(width, height)),
            log: RefCell::new(Vec::new()),
            stats: Cell::new(SoftStats::default()),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Snapshot of the last presented frame.
    pub fn front_buffer(&self) -> Surface {
        self.front.borrow().clone()
    }

    /// Snapshot of the frame being drawn.
    pub fn back_buffer(&self) -> Surface {
        self.back.borrow().clone()
    }

    /// Every command received so far, in submission order.
    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.log.borrow().clone()
    }

    /// Drain the command log.
    pub fn take_commands(&self) -> Vec<RecordedCommand> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    pub fn stats(&self) -> SoftStats {
        self.stats.get()
    }

    pub(crate) fn record(&self, command: RecordedCommand) {
        tracing::trace!(?command, "soft command");
        self.log.borrow_mut().push(command);
    }

    pub(crate) fn update_stats(&self, f: impl FnOnce(&mut SoftStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

impl RenderInstance for SoftRenderInstance {
    type Buffer = SoftBuffer;
    type Texture = SoftTexture;
    type VertexArrayObject = SoftVertexArrayObject;
    type Pipeline = SoftPipeline;
    type CommandQueue<'a> = SoftCommandQueue<'a>;

    fn backend_info(&self) -> BackendInfo {
        BackendInfo {
            name: "software",
            version: Self::VERSION,
            renderer: "duskforge reference rasterizer".into(),
        }
    }

    fn drawable_size(&self) -> (u32, u32) {
        let back = self.back.borrow();
        (back.width(), back.height())
    }

    fn create_buffer(&self, size_in_bytes: usize) -> SoftBuffer {
        tracing::debug!(size_in_bytes, "create buffer");
        SoftBuffer::new(size_in_bytes)
    }

    fn create_texture(&self, info: &TextureInfo) -> SoftTexture {
        validate::create_texture(info);
        tracing::debug!(?info, "create texture");
        SoftTexture::new(*info)
    }

    fn create_vertex_array_object(
        &self,
        buffer_element_counts: &[usize],
        layouts: &[VertexLayout],
        index_count: usize,
    ) -> SoftVertexArrayObject {
        validate::create_vertex_array_object(buffer_element_counts, layouts);
        tracing::debug!(?buffer_element_counts, index_count, "create vertex array object");
        SoftVertexArrayObject::new(buffer_element_counts, layouts, index_count)
    }

    fn create_pipeline(&self, descriptor: &PipelineDescriptor) -> SoftPipeline {
        tracing::debug!(label = %descriptor.label, "create pipeline");
        SoftPipeline {
            descriptor: descriptor.clone(),
        }
    }

    fn create_command_queue(&self) -> SoftCommandQueue<'_> {
        SoftCommandQueue::new(self)
    }
}
