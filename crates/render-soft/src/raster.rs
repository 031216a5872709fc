//! Built-in vertex program and triangle rasterizer.
//!
//! Attribute locations, numbered across all layouts of the VAO:
//! - 0: clip-space position, `xy` used
//! - 1: vertex color (opaque white when absent)
//! - 2: per-instance `xy` offset added to the position
//!
//! Later locations are fetched by GL shaders only and ignored here.

use crate::resource::SoftVertexArrayObject;
use crate::surface::Surface;
use duskforge_render::{BlendMode, Color, InputRate};

const POSITION: usize = 0;
const COLOR: usize = 1;
const OFFSET: usize = 2;
const USED_LOCATIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ShadedVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Run the built-in vertex program for one vertex of one instance.
pub(crate) fn fetch_vertex(
    vao: &SoftVertexArrayObject,
    vertex: usize,
    instance: usize,
) -> ShadedVertex {
    let mut attributes: [Option<[f32; 4]>; USED_LOCATIONS] = [None; USED_LOCATIONS];
    let mut location = 0;

    for (layout, buffer) in vao.layouts.iter().zip(&vao.buffers) {
        let element = match layout.input_rate {
            InputRate::Vertex => vertex,
            InputRate::Instance => instance,
        };
        let data = buffer.data.borrow();
        let base = element * layout.stride();
        for (format, offset) in layout.attributes.iter().zip(layout.offsets()) {
            if location < USED_LOCATIONS {
                let start = base + offset;
                let bytes = &data[start..start + format.size_in_bytes()];
                attributes[location] = Some(Color::decode(bytes, *format).to_array());
            }
            location += 1;
        }
    }

    let p = attributes[POSITION].unwrap_or([0.0, 0.0, 0.0, 1.0]);
    let o = attributes[OFFSET].unwrap_or([0.0; 4]);
    ShadedVertex {
        position: [p[0] + o[0], p[1] + o[1]],
        color: attributes[COLOR].unwrap_or(Color::WHITE.to_array()),
    }
}

/// Fill every pixel whose center lies inside the triangle, either winding.
/// Centers exactly on an edge follow the top-left rule, so triangles sharing
/// an edge write each pixel once. Colors are interpolated barycentrically.
/// Returns the pixels written.
pub(crate) fn rasterize(target: &mut Surface, tri: [ShadedVertex; 3], blend: BlendMode) -> u64 {
    let (w, h) = (target.width() as f32, target.height() as f32);
    let screen = tri.map(|v| [(v.position[0] + 1.0) * 0.5 * w, (1.0 - v.position[1]) * 0.5 * h]);

    let area = edge(screen[0], screen[1], screen[2]);
    if area == 0.0 || !area.is_finite() {
        return 0;
    }

    let min_x = screen.iter().map(|p| p[0]).fold(f32::INFINITY, f32::min).max(0.0);
    let max_x = screen.iter().map(|p| p[0]).fold(f32::NEG_INFINITY, f32::max).min(w);
    let min_y = screen.iter().map(|p| p[1]).fold(f32::INFINITY, f32::min).max(0.0);
    let max_y = screen.iter().map(|p| p[1]).fold(f32::NEG_INFINITY, f32::max).min(h);
    if min_x >= max_x || min_y >= max_y {
        return 0;
    }

    // Edge i is opposite vertex i.
    let owns_edge = [
        is_top_left(screen[1], screen[2], screen[0]),
        is_top_left(screen[2], screen[0], screen[1]),
        is_top_left(screen[0], screen[1], screen[2]),
    ];
    let flat = tri[0].color == tri[1].color && tri[1].color == tri[2].color;

    let mut written = 0;
    for y in min_y.floor() as u32..max_y.ceil() as u32 {
        for x in min_x.floor() as u32..max_x.ceil() as u32 {
            let p = [x as f32 + 0.5, y as f32 + 0.5];
            let b0 = edge(screen[1], screen[2], p) / area;
            let b1 = edge(screen[2], screen[0], p) / area;
            let b2 = edge(screen[0], screen[1], p) / area;
            let outside = [b0, b1, b2]
                .iter()
                .zip(owns_edge)
                .any(|(&b, owned)| b < 0.0 || (b == 0.0 && !owned));
            if outside {
                continue;
            }
            let color = if flat {
                tri[0].color
            } else {
                let mut color = [0.0; 4];
                for (c, out) in color.iter_mut().enumerate() {
                    *out = tri[0].color[c] * b0 + tri[1].color[c] * b1 + tri[2].color[c] * b2;
                }
                color
            };
            target.write(x, y, color, blend);
            written += 1;
        }
    }
    written
}

/// Whether edge `a`-`b` is a top or left edge of the triangle whose third
/// vertex is `c`, in screen space with y pointing down.
fn is_top_left(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> bool {
    if a[1] == b[1] {
        return c[1] > a[1];
    }
    let x_at_c = a[0] + (c[1] - a[1]) * (b[0] - a[0]) / (b[1] - a[1]);
    c[0] > x_at_c
}

fn edge(a: [f32; 2], b: [f32; 2], p: [f32; 2]) -> f32 {
    (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0])
}
