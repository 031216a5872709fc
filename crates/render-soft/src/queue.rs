use crate::instance::SoftRenderInstance;
use crate::raster::{fetch_vertex, rasterize};
use crate::record::RecordedCommand;
use crate::resource::{SoftBuffer, SoftTexture};
use duskforge_render::{Bindings, Color, CommandQueue, InputRate, validate};

/// Executes each command immediately against host memory.
pub struct SoftCommandQueue<'a> {
    instance: &'a SoftRenderInstance,
}

impl<'a> SoftCommandQueue<'a> {
    pub(crate) fn new(instance: &'a SoftRenderInstance) -> Self {
        Self { instance }
    }

    /// Run the built-in program over `vertices` (a triangle list) for every
    /// instance, writing into the back buffer.
    fn rasterize_list(
        &self,
        vertices: &[usize],
        instance_count: usize,
        bindings: &Bindings<'_, SoftRenderInstance>,
    ) {
        let vao = bindings.vao;
        let blend = bindings.pipeline.descriptor.blend;
        let mut target = self.instance.back.borrow_mut();

        let mut triangles = 0;
        let mut pixels = 0;
        for instance in 0..instance_count {
            for tri in vertices.chunks_exact(3) {
                let shaded = [
                    fetch_vertex(vao, tri[0], instance),
                    fetch_vertex(vao, tri[1], instance),
                    fetch_vertex(vao, tri[2], instance),
                ];
                pixels += rasterize(&mut target, shaded, blend);
                triangles += 1;
            }
        }

        self.instance.update_stats(|s| {
            s.draw_calls += 1;
            s.instances_drawn += instance_count as u64;
            s.triangles += triangles;
            s.pixels_written += pixels;
        });
    }
}

impl CommandQueue<SoftRenderInstance> for SoftCommandQueue<'_> {
    fn clear_texture(&mut self, texture: &SoftTexture, color: Color) {
        let texel = color.encode(texture.info.format);
        for layer in texture.layers.borrow_mut().iter_mut() {
            for chunk in layer.chunks_exact_mut(texel.len()) {
                chunk.copy_from_slice(&texel);
            }
        }
        self.instance.record(RecordedCommand::ClearTexture {
            color,
            layers: texture.info.array_layers,
        });
    }

    fn clear_framebuffer(&mut self, color: Color) {
        self.instance.back.borrow_mut().fill(color);
        self.instance
            .record(RecordedCommand::ClearFramebuffer { color });
    }

    fn update_buffer(&mut self, buffer: &SoftBuffer, offset: usize, data: &[u8]) {
        validate::update_buffer(buffer, offset, data.len());
        buffer.data.borrow_mut()[offset..offset + data.len()].copy_from_slice(data);
        self.instance.record(RecordedCommand::UpdateBuffer {
            offset,
            len: data.len(),
        });
    }

    fn update_texture(&mut self, texture: &SoftTexture, layer: u32, data: &[u8]) {
        validate::update_texture(texture, layer, data.len());
        texture.layers.borrow_mut()[layer as usize].copy_from_slice(data);
        self.instance.record(RecordedCommand::UpdateTexture {
            layer,
            len: data.len(),
        });
    }

    fn read_texture(&mut self, texture: &SoftTexture, layer: u32) -> Vec<u8> {
        validate::texture_layer(texture, layer);
        self.instance.record(RecordedCommand::ReadTexture { layer });
        texture.layers.borrow()[layer as usize].clone()
    }

    fn draw(
        &mut self,
        first_vertex: usize,
        vertex_count: usize,
        bindings: &Bindings<'_, SoftRenderInstance>,
    ) {
        validate::draw(first_vertex, vertex_count, bindings);
        self.instance.record(RecordedCommand::Draw {
            first_vertex,
            vertex_count,
            instance_count: 1,
            pipeline: bindings.pipeline.descriptor.label.clone(),
        });

        let vertices: Vec<usize> = (first_vertex..first_vertex + vertex_count).collect();
        self.rasterize_list(&vertices, 1, bindings);
    }

    fn draw_indexed(
        &mut self,
        first_index: usize,
        vertex_count: usize,
        bindings: &Bindings<'_, SoftRenderInstance>,
    ) {
        validate::draw_indexed(first_index, vertex_count, bindings);
        self.instance.record(RecordedCommand::DrawIndexed {
            first_index,
            vertex_count,
            pipeline: bindings.pipeline.descriptor.label.clone(),
        });

        let vao = bindings.vao;
        let vertex_limit = vao
            .layouts
            .iter()
            .zip(&vao.counts)
            .filter(|(layout, _)| layout.input_rate == InputRate::Vertex)
            .map(|(_, count)| *count)
            .min()
            .unwrap_or(usize::MAX);

        let indices: Vec<usize> = match &vao.index_buffer {
            Some(buffer) if vertex_count > 0 => {
                let data = buffer.data.borrow();
                data[first_index * 2..(first_index + vertex_count) * 2]
                    .chunks_exact(2)
                    .map(|c| u16::from_le_bytes([c[0], c[1]]))
                    .inspect(|i| validate::index_in_range(*i, vertex_limit))
                    .map(usize::from)
                    .collect()
            }
            _ => Vec::new(),
        };
        self.rasterize_list(&indices, 1, bindings);
    }

    fn draw_instances(
        &mut self,
        first_vertex: usize,
        vertex_count: usize,
        instance_count: usize,
        bindings: &Bindings<'_, SoftRenderInstance>,
    ) {
        validate::draw_instances(first_vertex, vertex_count, instance_count, bindings);
        self.instance.record(RecordedCommand::Draw {
            first_vertex,
            vertex_count,
            instance_count,
            pipeline: bindings.pipeline.descriptor.label.clone(),
        });

        let vertices: Vec<usize> = (first_vertex..first_vertex + vertex_count).collect();
        self.rasterize_list(&vertices, instance_count, bindings);
    }

    fn present(&mut self) {
        let frame = self.instance.stats().frames_presented + 1;
        *self.instance.front.borrow_mut() = self.instance.back.borrow().clone();
        self.instance.update_stats(|s| s.frames_presented = frame);
        self.instance.record(RecordedCommand::Present { frame });
    }
}
