//! Mapping from engine descriptors to GL enums.

use duskforge_render::{BlendMode, Filter, Format, fatal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TextureFormat {
    pub internal: i32,
    pub format: u32,
    pub ty: u32,
}

pub(crate) fn texture_format(format: Format) -> Option<TextureFormat> {
    let (internal, format, ty) = match format {
        Format::R8Unorm => (glow::R8, glow::RED, glow::UNSIGNED_BYTE),
        Format::Rgba8Unorm => (glow::RGBA8, glow::RGBA, glow::UNSIGNED_BYTE),
        Format::Rgba32Float => (glow::RGBA32F, glow::RGBA, glow::FLOAT),
        _ => return None,
    };
    Some(TextureFormat {
        internal: internal as i32,
        format,
        ty,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AttributeFormat {
    pub size: i32,
    pub ty: u32,
    pub normalized: bool,
}

pub(crate) fn vertex_attribute(format: Format) -> Option<AttributeFormat> {
    let (size, ty, normalized) = match format {
        Format::Float32 => (1, glow::FLOAT, false),
        Format::Float32x2 => (2, glow::FLOAT, false),
        Format::Float32x3 => (3, glow::FLOAT, false),
        Format::Float32x4 => (4, glow::FLOAT, false),
        Format::Unorm8x4 => (4, glow::UNSIGNED_BYTE, true),
        _ => return None,
    };
    Some(AttributeFormat {
        size,
        ty,
        normalized,
    })
}

/// Single-layer textures are plain 2D textures, everything else an array.
pub(crate) fn texture_target(array_layers: u32) -> u32 {
    if array_layers > 1 {
        glow::TEXTURE_2D_ARRAY
    } else {
        glow::TEXTURE_2D
    }
}

pub(crate) fn filter(filter: Filter) -> i32 {
    match filter {
        Filter::Nearest => glow::NEAREST as i32,
        Filter::Linear => glow::LINEAR as i32,
    }
}

/// Source and destination factors, `None` when blending is off.
pub(crate) fn blend_factors(blend: BlendMode) -> Option<(u32, u32)> {
    match blend {
        BlendMode::Replace => None,
        BlendMode::Alpha => Some((glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA)),
    }
}

/// Byte offset into a `u16` element buffer of index `first_index`.
pub(crate) fn index_byte_offset(first_index: usize) -> i32 {
    gl_int(first_index * std::mem::size_of::<u16>())
}

/// GL sizes and counts are `GLint`/`GLsizei`.
pub(crate) fn gl_int(value: usize) -> i32 {
    i32::try_from(value).unwrap_or_else(|_| fatal(format_args!("{value} does not fit a GLint")))
}

pub(crate) fn error_name(code: u32) -> &'static str {
    match code {
        glow::INVALID_ENUM => "GL_INVALID_ENUM",
        glow::INVALID_VALUE => "GL_INVALID_VALUE",
        glow::INVALID_OPERATION => "GL_INVALID_OPERATION",
        glow::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        glow::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        _ => "unknown GL error",
    }
}
