use duskforge_render::Color;

/// One command as the software backend received it.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCommand {
    ClearTexture {
        color: Color,
        layers: u32,
    },
    ClearFramebuffer {
        color: Color,
    },
    UpdateBuffer {
        offset: usize,
        len: usize,
    },
    UpdateTexture {
        layer: u32,
        len: usize,
    },
    ReadTexture {
        layer: u32,
    },
    Draw {
        first_vertex: usize,
        vertex_count: usize,
        instance_count: usize,
        pipeline: String,
    },
    DrawIndexed {
        first_index: usize,
        vertex_count: usize,
        pipeline: String,
    },
    Present {
        frame: u64,
    },
}

/// Running totals since the instance was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoftStats {
    pub draw_calls: u64,
    /// Instances rasterized, counting each copy of an instanced draw.
    pub instances_drawn: u64,
    pub triangles: u64,
    pub pixels_written: u64,
    pub frames_presented: u64,
}
