//! The demo frame, written against the render contract only.

use bytemuck::{Pod, Zeroable};
use duskforge_render::shaders::{
    flat_instanced_pipeline, flat_pipeline, flat_vertex_layout, instance_offset_layout,
};
use duskforge_render::{
    Bindings, BlendMode, Color, CommandQueue, RenderInstance, VertexArrayObject,
};

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 2],
    color: [f32; 4],
}

pub const BACKGROUND: Color = Color::new(0.05, 0.04, 0.08, 1.0);

const FLOOR: [f32; 4] = [0.25, 0.2, 0.15, 1.0];
const MARKER: [f32; 4] = [0.9, 0.1, 0.1, 0.75];

#[rustfmt::skip]
const FLOOR_QUAD: [Vertex; 4] = [
    Vertex { position: [-0.8, -0.8], color: FLOOR },
    Vertex { position: [ 0.8, -0.8], color: FLOOR },
    Vertex { position: [-0.8,  0.8], color: FLOOR },
    Vertex { position: [ 0.8,  0.8], color: FLOOR },
];
const FLOOR_INDICES: [u16; 6] = [0, 1, 2, 2, 1, 3];

#[rustfmt::skip]
const MARKER_TRIANGLE: [Vertex; 3] = [
    Vertex { position: [-0.05, -0.05], color: MARKER },
    Vertex { position: [ 0.05, -0.05], color: MARKER },
    Vertex { position: [ 0.0,   0.05], color: MARKER },
];

/// Offsets laying `count` markers out on a square grid inside the floor.
pub fn marker_offsets(count: usize) -> Vec<[f32; 2]> {
    let side = (count as f32).sqrt().ceil().max(1.0) as usize;
    let step = 1.4 / side as f32;
    (0..count)
        .map(|i| {
            let (col, row) = (i % side, i / side);
            [
                -0.7 + step * (col as f32 + 0.5),
                -0.7 + step * (row as f32 + 0.5),
            ]
        })
        .collect()
}

/// Clear, draw the floor and `markers` instanced markers, then present.
pub fn draw_frame<R: RenderInstance>(instance: &R, markers: usize) {
    let floor_pipeline = instance.create_pipeline(&flat_pipeline("floor", BlendMode::Replace));
    let marker_pipeline =
        instance.create_pipeline(&flat_instanced_pipeline("markers", BlendMode::Alpha));

    let floor = instance.create_vertex_array_object(
        &[FLOOR_QUAD.len()],
        &[flat_vertex_layout()],
        FLOOR_INDICES.len(),
    );
    let marker_vao = instance.create_vertex_array_object(
        &[MARKER_TRIANGLE.len(), markers],
        &[flat_vertex_layout(), instance_offset_layout()],
        0,
    );

    let mut queue = instance.create_command_queue();
    queue.update_buffer(floor.vertex_buffer(0), 0, bytemuck::cast_slice(&FLOOR_QUAD));
    if let Some(indices) = floor.index_buffer() {
        queue.update_buffer(indices, 0, bytemuck::cast_slice(&FLOOR_INDICES));
    }
    queue.update_buffer(marker_vao.vertex_buffer(0), 0, bytemuck::cast_slice(&MARKER_TRIANGLE));
    queue.update_buffer(
        marker_vao.vertex_buffer(1),
        0,
        bytemuck::cast_slice(&marker_offsets(markers)),
    );

    queue.clear_framebuffer(BACKGROUND);
    queue.draw_indexed(
        0,
        FLOOR_INDICES.len(),
        &Bindings::<R>::new(&floor, &floor_pipeline),
    );
    queue.draw_instances(
        0,
        MARKER_TRIANGLE.len(),
        markers,
        &Bindings::<R>::new(&marker_vao, &marker_pipeline),
    );
    queue.present();
}

#[cfg(test)]
mod tests {
    use super::*;
    use duskforge_render::RenderConfig;
    use duskforge_render_soft::{RecordedCommand, SoftRenderInstance};

    #[test]
    fn offsets_stay_inside_the_floor() {
        for count in [0, 1, 7, 64] {
            let offsets = marker_offsets(count);
            assert_eq!(offsets.len(), count);
            assert!(offsets.iter().flatten().all(|v| v.abs() < 0.8));
        }
    }

    #[test]
    fn frame_draws_floor_and_markers() {
        let instance = SoftRenderInstance::new(32, 32, &RenderConfig::default());
        draw_frame(&instance, 9);

        let stats = instance.stats();
        assert_eq!(stats.frames_presented, 1);
        assert_eq!(stats.draw_calls, 2);
        assert_eq!(stats.instances_drawn, 1 + 9);

        let front = instance.front_buffer();
        assert_eq!(front.pixel(0, 0), BACKGROUND);
        assert_eq!(front.pixel(5, 5), Color::from_array(FLOOR));
        assert_ne!(front.pixel(16, 16), Color::from_array(FLOOR));

        let draws: Vec<_> = instance
            .commands()
            .into_iter()
            .filter(|c| {
                matches!(
                    c,
                    RecordedCommand::Draw { .. } | RecordedCommand::DrawIndexed { .. }
                )
            })
            .collect();
        assert_eq!(draws.len(), 2);
    }

    #[test]
    fn frame_without_markers_still_presents() {
        let instance = SoftRenderInstance::new(8, 8, &RenderConfig::default());
        draw_frame(&instance, 0);
        assert_eq!(instance.stats().frames_presented, 1);
        assert_eq!(instance.stats().triangles, 2);
    }
}
