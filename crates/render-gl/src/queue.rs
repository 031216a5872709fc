use crate::bind::ScopedBind;
use crate::convert::{self, gl_int};
use crate::instance::GlRenderInstance;
use crate::resource::{GlBuffer, GlTexture, UPLOAD_TARGET};
use crate::window::GlWindow;
use duskforge_render::fatal::expect_backend;
use duskforge_render::{Bindings, Color, CommandQueue, RenderInstance, Texture, fatal, validate};
use glow::{HasContext, PixelPackData, PixelUnpackData};

/// Issues each command straight to the current GL context.
pub struct GlCommandQueue<'a, W: GlWindow> {
    instance: &'a GlRenderInstance<W>,
}

impl<'a, W: GlWindow> GlCommandQueue<'a, W> {
    pub(crate) fn new(instance: &'a GlRenderInstance<W>) -> Self {
        Self { instance }
    }

    fn gl(&self) -> &glow::Context {
        &self.instance.device.gl
    }

    /// Bind everything `bindings` names, run `issue`, then restore the
    /// default bindings.
    fn draw_with(
        &self,
        bindings: &Bindings<'_, GlRenderInstance<W>>,
        call: &str,
        issue: impl FnOnce(&glow::Context),
    ) {
        let gl = self.gl();
        let (width, height) = self.instance.drawable_size();

        let _program = ScopedBind::program(gl, bindings.pipeline.program);
        let _vao = ScopedBind::vertex_array(gl, bindings.vao.raw);
        let _textures: Vec<ScopedBind<'_>> = bindings
            .bound_textures()
            .map(|(slot, texture)| ScopedBind::texture_unit(gl, slot as u32, texture.target, texture.raw))
            .collect();
        let _uniforms: Vec<ScopedBind<'_>> = bindings
            .bound_uniforms()
            .map(|(slot, buffer)| ScopedBind::uniform_block(gl, slot as u32, buffer.raw))
            .collect();

        unsafe {
            gl.viewport(0, 0, gl_int(width as usize), gl_int(height as usize));
            match convert::blend_factors(bindings.pipeline.descriptor.blend) {
                Some((src, dst)) => {
                    gl.enable(glow::BLEND);
                    gl.blend_func(src, dst);
                }
                None => gl.disable(glow::BLEND),
            }
        }
        issue(gl);
        self.instance.device.check(call);
    }
}

impl<W: GlWindow> CommandQueue<GlRenderInstance<W>> for GlCommandQueue<'_, W> {
    fn clear_texture(&mut self, texture: &GlTexture, color: Color) {
        tracing::trace!(?color, layers = texture.array_layers(), "clear texture");
        let gl = self.gl();
        let framebuffer = expect_backend(unsafe { gl.create_framebuffer() }, "glGenFramebuffers");
        {
            let _bound = ScopedBind::framebuffer(gl, glow::DRAW_FRAMEBUFFER, framebuffer);
            unsafe {
                // Layered attachment: the clear reaches every array layer.
                gl.framebuffer_texture(glow::DRAW_FRAMEBUFFER, glow::COLOR_ATTACHMENT0, Some(texture.raw), 0);
                let status = gl.check_framebuffer_status(glow::DRAW_FRAMEBUFFER);
                if status != glow::FRAMEBUFFER_COMPLETE {
                    fatal(format_args!("texture clear target incomplete: 0x{status:x}"));
                }
                gl.viewport(0, 0, gl_int(texture.width() as usize), gl_int(texture.height() as usize));
                gl.clear_color(color.r, color.g, color.b, color.a);
                gl.clear(glow::COLOR_BUFFER_BIT);
            }
        }
        unsafe { gl.delete_framebuffer(framebuffer) };
        self.instance.device.check("clear texture");
    }

    fn clear_framebuffer(&mut self, color: Color) {
        tracing::trace!(?color, "clear framebuffer");
        let gl = self.gl();
        let (width, height) = self.instance.drawable_size();
        unsafe {
            gl.viewport(0, 0, gl_int(width as usize), gl_int(height as usize));
            gl.clear_color(color.r, color.g, color.b, color.a);
            gl.clear(glow::COLOR_BUFFER_BIT);
        }
        self.instance.device.check("clear framebuffer");
    }

    fn update_buffer(&mut self, buffer: &GlBuffer, offset: usize, data: &[u8]) {
        validate::update_buffer(buffer, offset, data.len());
        tracing::trace!(offset, len = data.len(), "update buffer");
        let gl = self.gl();
        {
            let _bound = ScopedBind::buffer(gl, UPLOAD_TARGET, buffer.raw);
            unsafe { gl.buffer_sub_data_u8_slice(UPLOAD_TARGET, gl_int(offset), data) };
        }
        self.instance.device.check("glBufferSubData");
    }

    fn update_texture(&mut self, texture: &GlTexture, layer: u32, data: &[u8]) {
        validate::update_texture(texture, layer, data.len());
        tracing::trace!(layer, len = data.len(), "update texture");
        let gl = self.gl();
        let info = texture.info();
        let format = convert::texture_format(info.format)
            .unwrap_or_else(|| fatal(format_args!("{:?} cannot back a texture", info.format)));
        let (width, height) = (gl_int(info.width as usize), gl_int(info.height as usize));
        {
            let _bound = ScopedBind::texture(gl, texture.target, texture.raw);
            unsafe {
                if texture.target == glow::TEXTURE_2D {
                    gl.tex_sub_image_2d(
                        texture.target,
                        0,
                        0,
                        0,
                        width,
                        height,
                        format.format,
                        format.ty,
                        PixelUnpackData::Slice(Some(data)),
                    );
                } else {
                    gl.tex_sub_image_3d(
                        texture.target,
                        0,
                        0,
                        0,
                        gl_int(layer as usize),
                        width,
                        height,
                        1,
                        format.format,
                        format.ty,
                        PixelUnpackData::Slice(Some(data)),
                    );
                }
            }
        }
        self.instance.device.check("glTexSubImage");
    }

    fn read_texture(&mut self, texture: &GlTexture, layer: u32) -> Vec<u8> {
        validate::texture_layer(texture, layer);
        let gl = self.gl();
        let info = texture.info();
        let format = convert::texture_format(info.format)
            .unwrap_or_else(|| fatal(format_args!("{:?} cannot back a texture", info.format)));

        // glGetTexImage returns every layer at once.
        let layer_size = info.layer_size_in_bytes();
        let mut data = vec![0; layer_size * info.array_layers as usize];
        {
            let _bound = ScopedBind::texture(gl, texture.target, texture.raw);
            unsafe {
                gl.get_tex_image(
                    texture.target,
                    0,
                    format.format,
                    format.ty,
                    PixelPackData::Slice(Some(&mut data[..])),
                );
            }
        }
        self.instance.device.check("glGetTexImage");

        let start = layer as usize * layer_size;
        data[start..start + layer_size].to_vec()
    }

    fn draw(
        &mut self,
        first_vertex: usize,
        vertex_count: usize,
        bindings: &Bindings<'_, GlRenderInstance<W>>,
    ) {
        validate::draw(first_vertex, vertex_count, bindings);
        tracing::trace!(first_vertex, vertex_count, "draw");
        self.draw_with(bindings, "glDrawArrays", |gl| unsafe {
            gl.draw_arrays(glow::TRIANGLES, gl_int(first_vertex), gl_int(vertex_count));
        });
    }

    fn draw_indexed(
        &mut self,
        first_index: usize,
        vertex_count: usize,
        bindings: &Bindings<'_, GlRenderInstance<W>>,
    ) {
        validate::draw_indexed(first_index, vertex_count, bindings);
        tracing::trace!(first_index, vertex_count, "draw indexed");
        self.draw_with(bindings, "glDrawElements", |gl| unsafe {
            gl.draw_elements(
                glow::TRIANGLES,
                gl_int(vertex_count),
                glow::UNSIGNED_SHORT,
                convert::index_byte_offset(first_index),
            );
        });
    }

    fn draw_instances(
        &mut self,
        first_vertex: usize,
        vertex_count: usize,
        instance_count: usize,
        bindings: &Bindings<'_, GlRenderInstance<W>>,
    ) {
        validate::draw_instances(first_vertex, vertex_count, instance_count, bindings);
        tracing::trace!(first_vertex, vertex_count, instance_count, "draw instances");
        self.draw_with(bindings, "glDrawArraysInstanced", |gl| unsafe {
            gl.draw_arrays_instanced(
                glow::TRIANGLES,
                gl_int(first_vertex),
                gl_int(vertex_count),
                gl_int(instance_count),
            );
        });
    }

    fn present(&mut self) {
        tracing::trace!("present");
        self.instance.window().swap_buffers();
    }
}
