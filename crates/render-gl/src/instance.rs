use crate::device::Device;
use crate::queue::GlCommandQueue;
use crate::resource::{GlBuffer, GlPipeline, GlTexture, GlVertexArrayObject};
use crate::window::{ContextAttributes, GlWindow};
use duskforge_render::{
    BackendInfo, BackendVersion, PipelineDescriptor, RenderConfig, RenderInstance, TextureInfo,
    VertexLayout, check_version, fatal, validate,
};
use glow::HasContext;
use std::rc::Rc;

/// OpenGL 3.3 core render instance owning the context of one window.
///
/// Dropping the instance destroys the context. Every resource created from it
/// must be dropped first.
pub struct GlRenderInstance<W: GlWindow> {
    pub(crate) device: Rc<Device>,
    window: W,
    config: RenderConfig,
    version: BackendVersion,
    renderer: String,
}

impl<W: GlWindow> GlRenderInstance<W> {
    /// Create the context on `window` and load the GL entry points.
    ///
    /// Aborts the process when the context cannot be created, the entry
    /// points do not resolve or the driver is older than OpenGL 3.3.
    pub fn new(mut window: W, config: &RenderConfig) -> Self {
        let attributes = ContextAttributes::core(config.debug_graphics);
        if let Err(err) = window.create_context(&attributes) {
            fatal(err);
        }
        if window.get_proc_address("glGetString").is_null() {
            fatal("failed to load OpenGL entry points: glGetString did not resolve");
        }
        let gl = unsafe { glow::Context::from_loader_function(|symbol| window.get_proc_address(symbol)) };

        let interval = config.swap_interval();
        if let Err(err) = window.set_swap_interval(interval) {
            tracing::warn!(%err, "keeping the driver's default swap interval");
        }

        let version = BackendVersion::new(gl.version().major, gl.version().minor);
        if let Err(err) = check_version(version) {
            fatal(err);
        }
        let renderer = unsafe { gl.get_parameter_string(glow::RENDERER) };

        unsafe {
            gl.disable(glow::CULL_FACE);
            gl.disable(glow::DEPTH_TEST);
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.pixel_store_i32(glow::PACK_ALIGNMENT, 1);
        }

        tracing::info!(
            %version,
            renderer = %renderer,
            swap_interval = ?interval,
            debug_graphics = config.debug_graphics,
            "OpenGL render instance created"
        );

        let device = Rc::new(Device::new(gl, config.debug_graphics));
        device.check("context setup");
        Self {
            device,
            window,
            config: *config,
            version,
            renderer,
        }
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Buffers, textures, VAOs and pipelines not yet dropped.
    pub fn live_resources(&self) -> usize {
        self.device.live_resources()
    }
}

impl<W: GlWindow> Drop for GlRenderInstance<W> {
    fn drop(&mut self) {
        let live = self.device.live_resources();
        if live > 0 {
            tracing::warn!(live, "render instance dropped before its resources");
        }
        self.window.destroy_context();
        tracing::debug!("OpenGL context destroyed");
    }
}

impl<W: GlWindow> RenderInstance for GlRenderInstance<W> {
    type Buffer = GlBuffer;
    type Texture = GlTexture;
    type VertexArrayObject = GlVertexArrayObject;
    type Pipeline = GlPipeline;
    type CommandQueue<'a>
        = GlCommandQueue<'a, W>
    where
        Self: 'a;

    fn backend_info(&self) -> BackendInfo {
        BackendInfo {
            name: "opengl",
            version: self.version,
            renderer: self.renderer.clone(),
        }
    }

    fn drawable_size(&self) -> (u32, u32) {
        self.window.drawable_size()
    }

    fn create_buffer(&self, size_in_bytes: usize) -> GlBuffer {
        tracing::debug!(size_in_bytes, "create buffer");
        GlBuffer::new(&self.device, size_in_bytes)
    }

    fn create_texture(&self, info: &TextureInfo) -> GlTexture {
        validate::create_texture(info);
        tracing::debug!(?info, "create texture");
        GlTexture::new(&self.device, *info)
    }

    fn create_vertex_array_object(
        &self,
        buffer_element_counts: &[usize],
        layouts: &[VertexLayout],
        index_count: usize,
    ) -> GlVertexArrayObject {
        validate::create_vertex_array_object(buffer_element_counts, layouts);
        tracing::debug!(?buffer_element_counts, index_count, "create vertex array object");
        GlVertexArrayObject::new(&self.device, buffer_element_counts, layouts, index_count)
    }

    fn create_pipeline(&self, descriptor: &PipelineDescriptor) -> GlPipeline {
        tracing::debug!(label = %descriptor.label, "create pipeline");
        GlPipeline::new(&self.device, descriptor)
    }

    fn create_command_queue(&self) -> GlCommandQueue<'_, W> {
        GlCommandQueue::new(self)
    }
}
