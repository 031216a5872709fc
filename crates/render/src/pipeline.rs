use crate::vertex::VertexLayout;

/// Color blending applied when a draw writes a pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Source replaces destination.
    #[default]
    Replace,
    /// Source-over alpha blending.
    Alpha,
}

/// Shader stages plus fixed-function state of a pipeline.
///
/// Shader sources are GLSL 330 core, already loaded by the caller. Backends
/// without a GLSL compiler ignore them and run their built-in program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineDescriptor {
    pub label: String,
    /// Layouts the pipeline expects; must equal the layouts of every VAO
    /// drawn with it.
    pub vertex_layouts: Vec<VertexLayout>,
    pub vertex_shader: String,
    pub fragment_shader: String,
    pub blend: BlendMode,
    /// Sampler uniform names and the texture slot each reads from.
    pub texture_slots: Vec<(String, u32)>,
    /// Uniform block names and the uniform slot each is bound to.
    pub uniform_blocks: Vec<(String, u32)>,
}

/// A fixed shading and draw configuration.
pub trait Pipeline {
    fn descriptor(&self) -> &PipelineDescriptor;
}
