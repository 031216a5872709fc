use glow::HasContext;

enum Target {
    Buffer(u32),
    Texture(u32),
    TextureUnit { unit: u32, target: u32 },
    UniformBlock(u32),
    VertexArray,
    Program,
    Framebuffer(u32),
}

/// Binds an object on construction and unbinds it on drop, so every command
/// leaves the default binding state behind.
pub(crate) struct ScopedBind<'a> {
    gl: &'a glow::Context,
    target: Target,
}

impl<'a> ScopedBind<'a> {
    pub fn buffer(gl: &'a glow::Context, target: u32, buffer: glow::Buffer) -> Self {
        unsafe { gl.bind_buffer(target, Some(buffer)) };
        Self {
            gl,
            target: Target::Buffer(target),
        }
    }

    pub fn texture(gl: &'a glow::Context, target: u32, texture: glow::Texture) -> Self {
        unsafe { gl.bind_texture(target, Some(texture)) };
        Self {
            gl,
            target: Target::Texture(target),
        }
    }

    pub fn texture_unit(gl: &'a glow::Context, unit: u32, target: u32, texture: glow::Texture) -> Self {
        unsafe {
            gl.active_texture(glow::TEXTURE0 + unit);
            gl.bind_texture(target, Some(texture));
            gl.active_texture(glow::TEXTURE0);
        }
        Self {
            gl,
            target: Target::TextureUnit { unit, target },
        }
    }

    pub fn uniform_block(gl: &'a glow::Context, slot: u32, buffer: glow::Buffer) -> Self {
        unsafe { gl.bind_buffer_base(glow::UNIFORM_BUFFER, slot, Some(buffer)) };
        Self {
            gl,
            target: Target::UniformBlock(slot),
        }
    }

    pub fn vertex_array(gl: &'a glow::Context, vao: glow::VertexArray) -> Self {
        unsafe { gl.bind_vertex_array(Some(vao)) };
        Self {
            gl,
            target: Target::VertexArray,
        }
    }

    pub fn program(gl: &'a glow::Context, program: glow::Program) -> Self {
        unsafe { gl.use_program(Some(program)) };
        Self {
            gl,
            target: Target::Program,
        }
    }

    pub fn framebuffer(gl: &'a glow::Context, target: u32, framebuffer: glow::Framebuffer) -> Self {
        unsafe { gl.bind_framebuffer(target, Some(framebuffer)) };
        Self {
            gl,
            target: Target::Framebuffer(target),
        }
    }
}

impl Drop for ScopedBind<'_> {
    fn drop(&mut self) {
        let gl = self.gl;
        unsafe {
            match self.target {
                Target::Buffer(target) => gl.bind_buffer(target, None),
                Target::Texture(target) => gl.bind_texture(target, None),
                Target::TextureUnit { unit, target } => {
                    gl.active_texture(glow::TEXTURE0 + unit);
                    gl.bind_texture(target, None);
                    gl.active_texture(glow::TEXTURE0);
                }
                Target::UniformBlock(slot) => gl.bind_buffer_base(glow::UNIFORM_BUFFER, slot, None),
                Target::VertexArray => gl.bind_vertex_array(None),
                Target::Program => gl.use_program(None),
                Target::Framebuffer(target) => gl.bind_framebuffer(target, None),
            }
        }
    }
}
