use crate::bind::ScopedBind;
use crate::convert::{self, gl_int};
use crate::device::Device;
use duskforge_render::fatal::expect_backend;
use duskforge_render::{
    Buffer, InputRate, Pipeline, PipelineDescriptor, Texture, TextureInfo, VertexArrayObject,
    VertexLayout, fatal,
};
use glow::{HasContext, PixelUnpackData};
use std::rc::Rc;

/// Buffers are allocated and updated through the copy-write target, which
/// is never part of vertex array state.
pub(crate) const UPLOAD_TARGET: u32 = glow::COPY_WRITE_BUFFER;

pub struct GlBuffer {
    device: Rc<Device>,
    pub(crate) raw: glow::Buffer,
    size: usize,
}

impl GlBuffer {
    pub(crate) fn new(device: &Rc<Device>, size: usize) -> Self {
        let gl = &device.gl;
        let raw = expect_backend(unsafe { gl.create_buffer() }, "glGenBuffers");
        {
            let _bound = ScopedBind::buffer(gl, UPLOAD_TARGET, raw);
            unsafe { gl.buffer_data_size(UPLOAD_TARGET, gl_int(size), glow::DYNAMIC_DRAW) };
        }
        device.check("glBufferData");
        device.track();
        Self {
            device: Rc::clone(device),
            raw,
            size,
        }
    }
}

impl Buffer for GlBuffer {
    fn size(&self) -> usize {
        self.size
    }
}

impl Drop for GlBuffer {
    fn drop(&mut self) {
        unsafe { self.device.gl.delete_buffer(self.raw) };
        self.device.untrack();
    }
}

pub struct GlTexture {
    device: Rc<Device>,
    pub(crate) raw: glow::Texture,
    pub(crate) target: u32,
    info: TextureInfo,
}

impl GlTexture {
    pub(crate) fn new(device: &Rc<Device>, info: TextureInfo) -> Self {
        let gl = &device.gl;
        let format = convert::texture_format(info.format)
            .unwrap_or_else(|| fatal(format_args!("{:?} cannot back a texture", info.format)));
        let target = convert::texture_target(info.array_layers);
        let raw = expect_backend(unsafe { gl.create_texture() }, "glGenTextures");

        let (width, height) = (gl_int(info.width as usize), gl_int(info.height as usize));
        {
            let _bound = ScopedBind::texture(gl, target, raw);
            unsafe {
                if target == glow::TEXTURE_2D {
                    gl.tex_image_2d(
                        target,
                        0,
                        format.internal,
                        width,
                        height,
                        0,
                        format.format,
                        format.ty,
                        PixelUnpackData::Slice(None),
                    );
                } else {
                    gl.tex_image_3d(
                        target,
                        0,
                        format.internal,
                        width,
                        height,
                        gl_int(info.array_layers as usize),
                        0,
                        format.format,
                        format.ty,
                        PixelUnpackData::Slice(None),
                    );
                }
                gl.tex_parameter_i32(target, glow::TEXTURE_MIN_FILTER, convert::filter(info.min_filter));
                gl.tex_parameter_i32(target, glow::TEXTURE_MAG_FILTER, convert::filter(info.mag_filter));
                gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
                gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
            }
        }
        device.check("glTexImage");
        device.track();
        Self {
            device: Rc::clone(device),
            raw,
            target,
            info,
        }
    }
}

impl Texture for GlTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }
}

impl Drop for GlTexture {
    fn drop(&mut self) {
        unsafe { self.device.gl.delete_texture(self.raw) };
        self.device.untrack();
    }
}

pub struct GlVertexArrayObject {
    device: Rc<Device>,
    pub(crate) raw: glow::VertexArray,
    layouts: Vec<VertexLayout>,
    counts: Vec<usize>,
    buffers: Vec<GlBuffer>,
    index_count: usize,
    index_buffer: Option<GlBuffer>,
}

impl GlVertexArrayObject {
    pub(crate) fn new(
        device: &Rc<Device>,
        counts: &[usize],
        layouts: &[VertexLayout],
        index_count: usize,
    ) -> Self {
        let gl = &device.gl;
        let buffers: Vec<GlBuffer> = counts
            .iter()
            .zip(layouts)
            .map(|(count, layout)| GlBuffer::new(device, count * layout.stride()))
            .collect();
        let index_buffer = (index_count > 0).then(|| GlBuffer::new(device, index_count * 2));
        let raw = expect_backend(unsafe { gl.create_vertex_array() }, "glGenVertexArrays");

        {
            let _vao = ScopedBind::vertex_array(gl, raw);
            let mut location = 0;
            for (layout, buffer) in layouts.iter().zip(&buffers) {
                let _vbo = ScopedBind::buffer(gl, glow::ARRAY_BUFFER, buffer.raw);
                let stride = gl_int(layout.stride());
                for (format, offset) in layout.attributes.iter().zip(layout.offsets()) {
                    let attribute = convert::vertex_attribute(*format).unwrap_or_else(|| {
                        fatal(format_args!("{format:?} cannot be a vertex attribute"))
                    });
                    unsafe {
                        gl.enable_vertex_attrib_array(location);
                        gl.vertex_attrib_pointer_f32(
                            location,
                            attribute.size,
                            attribute.ty,
                            attribute.normalized,
                            stride,
                            gl_int(offset),
                        );
                        if layout.input_rate == InputRate::Instance {
                            gl.vertex_attrib_divisor(location, 1);
                        }
                    }
                    location += 1;
                }
            }
            // The element binding is VAO state, so it stays bound when the
            // VAO is unbound.
            if let Some(index_buffer) = &index_buffer {
                unsafe { gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(index_buffer.raw)) };
            }
        }
        device.check("vertex array setup");
        device.track();

        Self {
            device: Rc::clone(device),
            raw,
            layouts: layouts.to_vec(),
            counts: counts.to_vec(),
            buffers,
            index_count,
            index_buffer,
        }
    }
}

impl VertexArrayObject for GlVertexArrayObject {
    type Buffer = GlBuffer;

    fn layouts(&self) -> &[VertexLayout] {
        &self.layouts
    }

    fn vertex_counts(&self) -> &[usize] {
        &self.counts
    }

    fn index_count(&self) -> usize {
        self.index_count
    }

    fn vertex_buffer(&self, index: usize) -> &GlBuffer {
        &self.buffers[index]
    }

    fn index_buffer(&self) -> Option<&GlBuffer> {
        self.index_buffer.as_ref()
    }
}

impl Drop for GlVertexArrayObject {
    fn drop(&mut self) {
        unsafe { self.device.gl.delete_vertex_array(self.raw) };
        self.device.untrack();
    }
}

/// A linked GLSL program plus its fixed-function state.
pub struct GlPipeline {
    device: Rc<Device>,
    pub(crate) program: glow::Program,
    pub(crate) descriptor: PipelineDescriptor,
}

impl GlPipeline {
    pub(crate) fn new(device: &Rc<Device>, descriptor: &PipelineDescriptor) -> Self {
        let gl = &device.gl;
        let label = &descriptor.label;
        let program = expect_backend(unsafe { gl.create_program() }, "glCreateProgram");

        let stages = [
            (glow::VERTEX_SHADER, "vertex", &descriptor.vertex_shader),
            (glow::FRAGMENT_SHADER, "fragment", &descriptor.fragment_shader),
        ];
        let mut shaders = Vec::with_capacity(stages.len());
        for (kind, stage, source) in stages {
            let shader = expect_backend(unsafe { gl.create_shader(kind) }, "glCreateShader");
            unsafe {
                gl.shader_source(shader, source);
                gl.compile_shader(shader);
                if !gl.get_shader_compile_status(shader) {
                    let log = gl.get_shader_info_log(shader);
                    fatal(format_args!("{stage} shader of pipeline '{label}' failed to compile: {log}"));
                }
                gl.attach_shader(program, shader);
            }
            shaders.push(shader);
        }

        unsafe {
            gl.link_program(program);
            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                fatal(format_args!("pipeline '{label}' failed to link: {log}"));
            }
            for shader in shaders {
                gl.detach_shader(program, shader);
                gl.delete_shader(shader);
            }
        }

        {
            let _bound = ScopedBind::program(gl, program);
            for (name, slot) in &descriptor.texture_slots {
                match unsafe { gl.get_uniform_location(program, name) } {
                    Some(location) => unsafe { gl.uniform_1_i32(Some(&location), *slot as i32) },
                    None => tracing::warn!(pipeline = %label, sampler = %name, "sampler not found in program"),
                }
            }
            for (name, slot) in &descriptor.uniform_blocks {
                match unsafe { gl.get_uniform_block_index(program, name) } {
                    Some(index) => unsafe { gl.uniform_block_binding(program, index, *slot) },
                    None => tracing::warn!(pipeline = %label, block = %name, "uniform block not found in program"),
                }
            }
        }
        device.check("pipeline link");
        device.track();

        Self {
            device: Rc::clone(device),
            program,
            descriptor: descriptor.clone(),
        }
    }
}

impl Pipeline for GlPipeline {
    fn descriptor(&self) -> &PipelineDescriptor {
        &self.descriptor
    }
}

impl Drop for GlPipeline {
    fn drop(&mut self) {
        unsafe { self.device.gl.delete_program(self.program) };
        self.device.untrack();
    }
}
