use duskforge_render::{BlendMode, Color};

/// A CPU-side color target, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 4]; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        Color::from_array(self.pixels[self.index(x, y)])
    }

    pub fn pixels(&self) -> impl Iterator<Item = Color> + '_ {
        self.pixels.iter().map(|p| Color::from_array(*p))
    }

    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color.to_array());
    }

    pub(crate) fn write(&mut self, x: u32, y: u32, color: [f32; 4], blend: BlendMode) {
        let i = self.index(x, y);
        self.pixels[i] = match blend {
            BlendMode::Replace => color,
            BlendMode::Alpha => {
                let dst = self.pixels[i];
                let a = color[3];
                [
                    color[0] * a + dst[0] * (1.0 - a),
                    color[1] * a + dst[1] * (1.0 - a),
                    color[2] * a + dst[2] * (1.0 - a),
                    a + dst[3] * (1.0 - a),
                ]
            }
        };
    }

    /// Pixels as tightly packed RGBA8, rows top to bottom.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| Color::from_array(*p).encode(duskforge_render::Format::Rgba8Unorm))
            .collect()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_surface_is_transparent_black() {
        let s = Surface::new(2, 2);
        assert!(s.pixels().all(|p| p == Color::TRANSPARENT));
    }

    #[test]
    fn alpha_blend_is_source_over() {
        let mut s = Surface::new(1, 1);
        s.fill(Color::new(0.0, 0.0, 1.0, 1.0));
        s.write(0, 0, [1.0, 0.0, 0.0, 0.5], BlendMode::Alpha);
        assert_eq!(s.pixel(0, 0), Color::new(0.5, 0.0, 0.5, 1.0));
    }

    #[test]
    fn rgba8_export() {
        let mut s = Surface::new(1, 2);
        s.fill(Color::WHITE);
        assert_eq!(s.to_rgba8(), vec![255; 8]);
    }
}
