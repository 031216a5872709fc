use crate::instance::RenderInstance;

/// Number of texture units a draw can bind.
pub const MAX_TEXTURE_SLOTS: usize = 8;

/// Number of uniform buffer binding points a draw can bind.
pub const MAX_UNIFORM_SLOTS: usize = 4;

/// Resources active for a single draw call.
///
/// Everything is borrowed, so bindings cannot outlive the resources they name
/// and are not kept by the queue once the call returns.
pub struct Bindings<'a, R: RenderInstance> {
    pub vao: &'a R::VertexArrayObject,
    pub pipeline: &'a R::Pipeline,
    pub textures: [Option<&'a R::Texture>; MAX_TEXTURE_SLOTS],
    pub uniforms: [Option<&'a R::Buffer>; MAX_UNIFORM_SLOTS],
}

impl<'a, R: RenderInstance> Bindings<'a, R> {
    pub fn new(vao: &'a R::VertexArrayObject, pipeline: &'a R::Pipeline) -> Self {
        Self {
            vao,
            pipeline,
            textures: [None; MAX_TEXTURE_SLOTS],
            uniforms: [None; MAX_UNIFORM_SLOTS],
        }
    }

    pub fn with_texture(mut self, slot: usize, texture: &'a R::Texture) -> Self {
        self.textures[slot] = Some(texture);
        self
    }

    pub fn with_uniform_buffer(mut self, slot: usize, buffer: &'a R::Buffer) -> Self {
        self.uniforms[slot] = Some(buffer);
        self
    }

    /// Bound textures with their slot index.
    pub fn bound_textures(&self) -> impl Iterator<Item = (usize, &'a R::Texture)> + '_ {
        self.textures
            .iter()
            .enumerate()
            .filter_map(|(slot, t)| t.map(|t| (slot, t)))
    }

    /// Bound uniform buffers with their slot index.
    pub fn bound_uniforms(&self) -> impl Iterator<Item = (usize, &'a R::Buffer)> + '_ {
        self.uniforms
            .iter()
            .enumerate()
            .filter_map(|(slot, b)| b.map(|b| (slot, b)))
    }
}

impl<R: RenderInstance> Clone for Bindings<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: RenderInstance> Copy for Bindings<'_, R> {}
