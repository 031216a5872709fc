//! Built-in GLSL 330 core program for flat-colored, optionally instanced
//! triangles.
//!
//! The attribute locations match the fixed program of the software backend,
//! so the same pipeline descriptor draws identically on every backend.

use crate::format::Format;
use crate::pipeline::{BlendMode, PipelineDescriptor};
use crate::vertex::VertexLayout;

pub const FLAT_VERTEX_SHADER: &str = r#"#version 330 core
layout(location = 0) in vec2 position;
layout(location = 1) in vec4 color;

out vec4 v_color;

void main() {
    v_color = color;
    gl_Position = vec4(position, 0.0, 1.0);
}
"#;

pub const FLAT_INSTANCED_VERTEX_SHADER: &str = r#"#version 330 core
layout(location = 0) in vec2 position;
layout(location = 1) in vec4 color;
layout(location = 2) in vec2 offset;

out vec4 v_color;

void main() {
    v_color = color;
    gl_Position = vec4(position + offset, 0.0, 1.0);
}
"#;

pub const FLAT_FRAGMENT_SHADER: &str = r#"#version 330 core
in vec4 v_color;
out vec4 frag_color;

void main() {
    frag_color = v_color;
}
"#;

/// Per-vertex layout of the flat program: clip-space `xy` then RGBA color.
pub fn flat_vertex_layout() -> VertexLayout {
    VertexLayout::per_vertex([Format::Float32x2, Format::Float32x4])
}

/// Per-instance layout of the instanced flat program: an `xy` offset.
pub fn instance_offset_layout() -> VertexLayout {
    VertexLayout::per_instance([Format::Float32x2])
}

/// Flat-colored triangles, one vertex buffer.
pub fn flat_pipeline(label: &str, blend: BlendMode) -> PipelineDescriptor {
    PipelineDescriptor {
        label: label.to_owned(),
        vertex_layouts: vec![flat_vertex_layout()],
        vertex_shader: FLAT_VERTEX_SHADER.to_owned(),
        fragment_shader: FLAT_FRAGMENT_SHADER.to_owned(),
        blend,
        ..PipelineDescriptor::default()
    }
}

/// Flat-colored triangles repeated per instance at an offset read from a
/// second, per-instance buffer.
pub fn flat_instanced_pipeline(label: &str, blend: BlendMode) -> PipelineDescriptor {
    PipelineDescriptor {
        label: label.to_owned(),
        vertex_layouts: vec![flat_vertex_layout(), instance_offset_layout()],
        vertex_shader: FLAT_INSTANCED_VERTEX_SHADER.to_owned(),
        fragment_shader: FLAT_FRAGMENT_SHADER.to_owned(),
        blend,
        ..PipelineDescriptor::default()
    }
}
