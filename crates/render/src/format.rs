/// Pixel and vertex attribute formats understood by every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    // Texture formats
    R8Unorm,
    Rgba8Unorm,
    Rgba32Float,

    // Vertex attribute formats
    Float32,
    Float32x2,
    Float32x3,
    Float32x4,
    Unorm8x4,
}

impl Format {
    pub fn size_in_bytes(self) -> usize {
        match self {
            Self::R8Unorm => 1,
            Self::Rgba8Unorm | Self::Unorm8x4 | Self::Float32 => 4,
            Self::Float32x2 => 8,
            Self::Float32x3 => 12,
            Self::Rgba32Float | Self::Float32x4 => 16,
        }
    }

    pub fn component_count(self) -> usize {
        match self {
            Self::R8Unorm | Self::Float32 => 1,
            Self::Float32x2 => 2,
            Self::Float32x3 => 3,
            Self::Rgba8Unorm | Self::Rgba32Float | Self::Float32x4 | Self::Unorm8x4 => 4,
        }
    }

    /// Whether textures may be created with this format.
    pub fn is_texture_format(self) -> bool {
        matches!(self, Self::R8Unorm | Self::Rgba8Unorm | Self::Rgba32Float)
    }

    /// Whether this format may appear in a [`crate::VertexLayout`].
    pub fn is_vertex_format(self) -> bool {
        !self.is_texture_format()
    }
}

/// Texture sampling filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    Nearest,
    #[default]
    Linear,
}

/// Normalized RGBA color.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_array(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    /// Encode this color as one texel of `format`.
    ///
    /// Normalized formats clamp each component to `[0, 1]` and round to the
    /// nearest representable value, the same conversion a GL clear performs.
    pub fn encode(self, format: Format) -> Vec<u8> {
        match format {
            Format::R8Unorm => vec![unorm8(self.r)],
            Format::Rgba8Unorm | Format::Unorm8x4 => {
                self.to_array().iter().map(|c| unorm8(*c)).collect()
            }
            Format::Rgba32Float | Format::Float32x4 => {
                bytemuck::cast_slice(&self.to_array()).to_vec()
            }
            Format::Float32 => self.r.to_le_bytes().to_vec(),
            Format::Float32x2 => bytemuck::cast_slice(&[self.r, self.g]).to_vec(),
            Format::Float32x3 => bytemuck::cast_slice(&[self.r, self.g, self.b]).to_vec(),
        }
    }

    /// Decode one texel of `format` back to a color. Missing channels read as
    /// zero, missing alpha as one.
    pub fn decode(bytes: &[u8], format: Format) -> Self {
        debug_assert_eq!(bytes.len(), format.size_in_bytes());
        match format {
            Format::R8Unorm => Self::new(bytes[0] as f32 / 255.0, 0.0, 0.0, 1.0),
            Format::Rgba8Unorm | Format::Unorm8x4 => Self::new(
                bytes[0] as f32 / 255.0,
                bytes[1] as f32 / 255.0,
                bytes[2] as f32 / 255.0,
                bytes[3] as f32 / 255.0,
            ),
            _ => {
                let mut c = [0.0, 0.0, 0.0, 1.0];
                for (i, chunk) in bytes.chunks_exact(4).enumerate() {
                    c[i] = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                }
                Self::from_array(c)
            }
        }
    }
}

fn unorm8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_sizes() {
        assert_eq!(Format::Rgba8Unorm.size_in_bytes(), 4);
        assert_eq!(Format::Rgba32Float.size_in_bytes(), 16);
        assert_eq!(Format::Float32x3.size_in_bytes(), 12);
        assert_eq!(Format::Float32x3.component_count(), 3);
    }

    #[test]
    fn texture_and_vertex_formats_are_disjoint() {
        for f in [
            Format::R8Unorm,
            Format::Rgba8Unorm,
            Format::Rgba32Float,
            Format::Float32,
            Format::Float32x2,
            Format::Float32x3,
            Format::Float32x4,
            Format::Unorm8x4,
        ] {
            assert_ne!(f.is_texture_format(), f.is_vertex_format());
        }
    }

    #[test]
    fn encode_rgba8_rounds_and_clamps() {
        let bytes = Color::new(0.5, 1.5, -1.0, 1.0).encode(Format::Rgba8Unorm);
        assert_eq!(bytes, vec![128, 255, 0, 255]);
    }

    #[test]
    fn encode_float_keeps_exact_values() {
        let c = Color::new(0.25, 0.5, 0.75, 1.0);
        let bytes = c.encode(Format::Rgba32Float);
        assert_eq!(Color::decode(&bytes, Format::Rgba32Float), c);
    }

    #[test]
    fn decode_r8_fills_alpha() {
        let c = Color::decode(&[255], Format::R8Unorm);
        assert_eq!(c, Color::new(1.0, 0.0, 0.0, 1.0));
    }
}
