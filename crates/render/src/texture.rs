use crate::format::{Filter, Format};

/// Creation descriptor and read-only description of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
    pub array_layers: u32,
    pub format: Format,
    pub min_filter: Filter,
    pub mag_filter: Filter,
}

impl Default for TextureInfo {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            array_layers: 1,
            format: Format::Rgba8Unorm,
            min_filter: Filter::Linear,
            mag_filter: Filter::Linear,
        }
    }
}

impl TextureInfo {
    pub fn new(width: u32, height: u32, format: Format) -> Self {
        Self {
            width,
            height,
            format,
            ..Self::default()
        }
    }

    pub fn with_layers(mut self, array_layers: u32) -> Self {
        self.array_layers = array_layers;
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.min_filter = filter;
        self.mag_filter = filter;
        self
    }

    /// Size of one layer in bytes.
    pub fn layer_size_in_bytes(&self) -> usize {
        self.width as usize * self.height as usize * self.format.size_in_bytes()
    }
}

/// A 2D or 2D-array image owned by a backend.
pub trait Texture {
    fn info(&self) -> &TextureInfo;

    fn width(&self) -> u32 {
        self.info().width
    }

    fn height(&self) -> u32 {
        self.info().height
    }

    fn array_layers(&self) -> u32 {
        self.info().array_layers
    }
}
