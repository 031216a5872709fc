//! Software render backend.
//!
//! Implements the render contract on the host CPU: buffers and textures are
//! byte vectors, draws run a fixed vertex program and a scanline-free
//! half-space rasterizer into a back buffer, and `present` copies the back
//! buffer to the front buffer. Every command is logged, which makes this the
//! backend tests and headless tools run against.
//!
//! # Invariants
//! - Single-threaded: resources use `RefCell`, so nothing here is `Sync`.
//! - Commands execute immediately, in call order.

mod instance;
mod queue;
mod raster;
mod record;
mod resource;
mod surface;

pub use instance::SoftRenderInstance;
pub use queue::SoftCommandQueue;
pub use record::{RecordedCommand, SoftStats};
pub use resource::{SoftBuffer, SoftPipeline, SoftTexture, SoftVertexArrayObject};
pub use surface::Surface;

/// Bindings for the software backend.
pub type SoftBindings<'a> = duskforge_render::Bindings<'a, SoftRenderInstance>;

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::{Pod, Zeroable};
    use duskforge_render::{
        BlendMode, Buffer, Color, CommandQueue, Filter, Format, PipelineDescriptor,
        RenderConfig, RenderInstance, Texture, TextureInfo, VertexArrayObject, VertexLayout,
    };

    const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);
    const GREEN: Color = Color::new(0.0, 1.0, 0.0, 1.0);
    const BLUE: Color = Color::new(0.0, 0.0, 1.0, 1.0);

    #[repr(C)]
    #[derive(Copy, Clone, Pod, Zeroable)]
    struct Vertex {
        position: [f32; 2],
        color: [f32; 4],
    }

    fn v(x: f32, y: f32, color: Color) -> Vertex {
        Vertex {
            position: [x, y],
            color: color.to_array(),
        }
    }

    /// Triangle covering the whole viewport.
    fn full_screen(color: Color) -> [Vertex; 3] {
        [v(-1.0, -1.0, color), v(3.0, -1.0, color), v(-1.0, 3.0, color)]
    }

    fn vertex_layout() -> VertexLayout {
        VertexLayout::per_vertex([Format::Float32x2, Format::Float32x4])
    }

    fn instance() -> SoftRenderInstance {
        SoftRenderInstance::new(8, 8, &RenderConfig::default())
    }

    fn pipeline(instance: &SoftRenderInstance, layouts: Vec<VertexLayout>) -> SoftPipeline {
        instance.create_pipeline(&PipelineDescriptor {
            label: "flat".into(),
            vertex_layouts: layouts,
            ..PipelineDescriptor::default()
        })
    }

    fn mesh(instance: &SoftRenderInstance, vertices: &[Vertex], indices: &[u16]) -> SoftVertexArrayObject {
        let vao = instance.create_vertex_array_object(&[vertices.len()], &[vertex_layout()], indices.len());
        let mut queue = instance.create_command_queue();
        queue.update_buffer(vao.vertex_buffer(0), 0, bytemuck::cast_slice(vertices));
        if let Some(index_buffer) = vao.index_buffer() {
            queue.update_buffer(index_buffer, 0, bytemuck::cast_slice(indices));
        }
        vao
    }

    #[test]
    fn clear_texture_fills_every_pixel() {
        let instance = instance();
        let mut queue = instance.create_command_queue();
        for color in [RED, Color::new(0.25, 0.5, 0.75, 1.0), Color::TRANSPARENT, Color::WHITE] {
            let texture = instance.create_texture(&TextureInfo::new(5, 3, Format::Rgba32Float));
            queue.clear_texture(&texture, color);
            let bytes = queue.read_texture(&texture, 0);
            assert_eq!(bytes.len(), 5 * 3 * 16);
            for texel in bytes.chunks_exact(16) {
                assert_eq!(Color::decode(texel, Format::Rgba32Float), color);
            }
        }
    }

    #[test]
    fn clear_texture_rgba8_quantizes() {
        let instance = instance();
        let mut queue = instance.create_command_queue();
        let texture = instance.create_texture(&TextureInfo::new(4, 4, Format::Rgba8Unorm));
        queue.clear_texture(&texture, Color::new(0.0, 0.5, 1.0, 1.0));
        let bytes = queue.read_texture(&texture, 0);
        assert!(bytes.chunks_exact(4).all(|t| t == [0, 128, 255, 255]));
    }

    #[test]
    fn clear_texture_covers_all_layers() {
        let instance = instance();
        let mut queue = instance.create_command_queue();
        let info = TextureInfo::new(2, 2, Format::Rgba8Unorm)
            .with_layers(3)
            .with_filter(Filter::Nearest);
        let texture = instance.create_texture(&info);
        queue.clear_texture(&texture, GREEN);
        for layer in 0..3 {
            let bytes = queue.read_texture(&texture, layer);
            assert!(bytes.chunks_exact(4).all(|t| t == [0, 255, 0, 255]));
        }
        assert_eq!(texture.info().min_filter, Filter::Nearest);
    }

    #[test]
    fn update_texture_replaces_one_layer() {
        let instance = instance();
        let mut queue = instance.create_command_queue();
        let texture = instance.create_texture(&TextureInfo::new(1, 2, Format::R8Unorm).with_layers(2));
        queue.update_texture(&texture, 1, &[7, 9]);
        assert_eq!(queue.read_texture(&texture, 0), vec![0, 0]);
        assert_eq!(queue.read_texture(&texture, 1), vec![7, 9]);
    }

    #[test]
    fn later_draw_wins_per_pixel() {
        let instance = instance();
        let red = mesh(&instance, &full_screen(RED), &[]);
        let green = mesh(&instance, &full_screen(GREEN), &[]);
        let pipeline = pipeline(&instance, vec![vertex_layout()]);

        let mut queue = instance.create_command_queue();
        queue.draw(0, 3, &SoftBindings::new(&red, &pipeline));
        queue.draw(0, 3, &SoftBindings::new(&green, &pipeline));
        assert!(instance.back_buffer().pixels().all(|p| p == GREEN));

        queue.draw(0, 3, &SoftBindings::new(&green, &pipeline));
        queue.draw(0, 3, &SoftBindings::new(&red, &pipeline));
        assert!(instance.back_buffer().pixels().all(|p| p == RED));
    }

    #[test]
    fn draw_indexed_fetches_only_the_requested_range() {
        let instance = instance();
        // Full-screen quad split along the top-left to bottom-right diagonal.
        let vertices = [v(-1.0, -1.0, RED), v(1.0, -1.0, RED), v(-1.0, 1.0, RED), v(1.0, 1.0, RED)];
        let vao = mesh(&instance, &vertices, &[0, 1, 2, 2, 1, 3]);
        let pipeline = pipeline(&instance, vec![vertex_layout()]);

        let mut queue = instance.create_command_queue();
        queue.clear_framebuffer(BLUE);
        queue.draw_indexed(3, 3, &SoftBindings::new(&vao, &pipeline));

        let back = instance.back_buffer();
        assert_eq!(back.pixel(7, 0), RED, "top-right belongs to the second triangle");
        assert_eq!(back.pixel(0, 7), BLUE, "bottom-left belongs to the first triangle");
        assert_eq!(instance.stats().triangles, 1);
        assert!(instance.commands().contains(&RecordedCommand::DrawIndexed {
            first_index: 3,
            vertex_count: 3,
            pipeline: "flat".into(),
        }));
    }

    #[test]
    fn empty_vao_draw_is_a_no_op() {
        let instance = instance();
        let vao = instance.create_vertex_array_object(&[0], &[vertex_layout()], 0);
        assert!(vao.index_buffer().is_none());
        assert_eq!(vao.vertex_buffer(0).size(), 0);
        let pipeline = pipeline(&instance, vec![vertex_layout()]);

        let mut queue = instance.create_command_queue();
        queue.clear_framebuffer(BLUE);
        let before = instance.back_buffer();
        queue.draw(0, 0, &SoftBindings::new(&vao, &pipeline));

        assert_eq!(instance.back_buffer(), before);
        assert_eq!(instance.stats().triangles, 0);
        assert_eq!(instance.stats().pixels_written, 0);
    }

    #[test]
    fn dropping_an_unused_buffer_leaves_other_resources_intact() {
        let instance = instance();
        let mut queue = instance.create_command_queue();
        let texture = instance.create_texture(&TextureInfo::new(2, 2, Format::Rgba8Unorm));
        queue.clear_texture(&texture, RED);

        let buffer = instance.create_buffer(256);
        assert_eq!(buffer.size(), 256);
        drop(buffer);

        let bytes = queue.read_texture(&texture, 0);
        assert!(bytes.chunks_exact(4).all(|t| t == [255, 0, 0, 255]));
    }

    #[test]
    fn buffers_start_zeroed_and_take_partial_updates() {
        let instance = instance();
        let mut queue = instance.create_command_queue();
        let buffer = instance.create_buffer(6);
        queue.update_buffer(&buffer, 2, &[1, 2, 3]);
        assert_eq!(buffer.contents(), vec![0, 0, 1, 2, 3, 0]);
    }

    #[test]
    fn draw_instances_issues_every_copy() {
        let instance = instance();
        let vao = mesh(&instance, &full_screen(RED), &[]);
        let pipeline = pipeline(&instance, vec![vertex_layout()]);

        let mut queue = instance.create_command_queue();
        queue.draw_instances(0, 3, 100, &SoftBindings::new(&vao, &pipeline));

        let stats = instance.stats();
        assert_eq!(stats.draw_calls, 1);
        assert_eq!(stats.instances_drawn, 100);
        assert_eq!(stats.triangles, 100);
        assert_eq!(
            instance.commands().last(),
            Some(&RecordedCommand::Draw {
                first_vertex: 0,
                vertex_count: 3,
                instance_count: 100,
                pipeline: "flat".into(),
            })
        );
    }

    #[test]
    fn per_instance_offsets_move_each_copy() {
        let instance = instance();
        let layouts = vec![
            vertex_layout(),
            VertexLayout::per_instance([Format::Float32x2]),
        ];
        // Small triangle in the bottom-left quadrant.
        let tri = [v(-1.0, -1.0, RED), v(-0.5, -1.0, RED), v(-1.0, -0.5, RED)];
        let vao = instance.create_vertex_array_object(&[3, 2], &layouts, 0);
        let pipeline = pipeline(&instance, layouts);

        let mut queue = instance.create_command_queue();
        queue.update_buffer(vao.vertex_buffer(0), 0, bytemuck::cast_slice(&tri));
        let offsets: [[f32; 2]; 2] = [[0.0, 0.0], [1.0, 1.0]];
        queue.update_buffer(vao.vertex_buffer(1), 0, bytemuck::cast_slice(&offsets));
        queue.draw_instances(0, 3, 2, &SoftBindings::new(&vao, &pipeline));

        let back = instance.back_buffer();
        assert_eq!(back.pixel(0, 7), RED, "first copy stays bottom-left");
        assert_eq!(back.pixel(4, 3), RED, "second copy moves to the centre");
        assert_eq!(back.pixel(7, 0), Color::TRANSPARENT);
    }

    #[test]
    fn alpha_pipeline_blends_over_the_framebuffer() {
        let instance = instance();
        let vao = mesh(&instance, &full_screen(Color::new(1.0, 0.0, 0.0, 0.5)), &[]);
        let pipeline = instance.create_pipeline(&PipelineDescriptor {
            label: "alpha".into(),
            vertex_layouts: vec![vertex_layout()],
            blend: BlendMode::Alpha,
            ..PipelineDescriptor::default()
        });

        let mut queue = instance.create_command_queue();
        queue.clear_framebuffer(BLUE);
        queue.draw(0, 3, &SoftBindings::new(&vao, &pipeline));
        assert_eq!(instance.back_buffer().pixel(3, 3), Color::new(0.5, 0.0, 0.5, 1.0));
    }

    #[test]
    fn alpha_blended_quad_blends_its_diagonal_once() {
        let instance = instance();
        let c = Color::new(1.0, 0.0, 0.0, 0.5);
        let vertices = [v(-1.0, -1.0, c), v(1.0, -1.0, c), v(-1.0, 1.0, c), v(1.0, 1.0, c)];
        let vao = mesh(&instance, &vertices, &[0, 1, 2, 2, 1, 3]);
        let pipeline = instance.create_pipeline(&PipelineDescriptor {
            label: "alpha".into(),
            vertex_layouts: vec![vertex_layout()],
            blend: BlendMode::Alpha,
            ..PipelineDescriptor::default()
        });

        let mut queue = instance.create_command_queue();
        queue.clear_framebuffer(BLUE);
        queue.draw_indexed(0, 6, &SoftBindings::new(&vao, &pipeline));

        assert_eq!(instance.stats().pixels_written, 64);
        let back = instance.back_buffer();
        assert_eq!(back.pixel(3, 3), Color::new(0.5, 0.0, 0.5, 1.0));
        assert!(back.pixels().all(|p| p == Color::new(0.5, 0.0, 0.5, 1.0)));
    }

    #[test]
    fn present_publishes_the_back_buffer() {
        let instance = instance();
        let mut queue = instance.create_command_queue();
        queue.clear_framebuffer(GREEN);
        assert!(instance.front_buffer().pixels().all(|p| p == Color::TRANSPARENT));

        queue.present();
        assert!(instance.front_buffer().pixels().all(|p| p == GREEN));
        assert_eq!(instance.stats().frames_presented, 1);
        assert_eq!(
            instance.commands().last(),
            Some(&RecordedCommand::Present { frame: 1 })
        );
    }

    #[test]
    fn commands_are_logged_in_submission_order() {
        let instance = instance();
        let vao = mesh(&instance, &full_screen(RED), &[]);
        let pipeline = pipeline(&instance, vec![vertex_layout()]);
        instance.take_commands();

        let mut queue = instance.create_command_queue();
        queue.clear_framebuffer(BLUE);
        queue.draw(0, 3, &SoftBindings::new(&vao, &pipeline));
        queue.present();

        let log = instance.take_commands();
        assert!(matches!(log[0], RecordedCommand::ClearFramebuffer { .. }));
        assert!(matches!(log[1], RecordedCommand::Draw { .. }));
        assert!(matches!(log[2], RecordedCommand::Present { frame: 1 }));
        assert_eq!(log.len(), 3);
        assert!(instance.commands().is_empty());
    }

    #[test]
    fn textures_and_uniforms_can_be_bound() {
        let instance = instance();
        let vao = mesh(&instance, &full_screen(RED), &[]);
        let pipeline = pipeline(&instance, vec![vertex_layout()]);
        let texture = instance.create_texture(&TextureInfo::new(1, 1, Format::Rgba8Unorm));
        let uniforms = instance.create_buffer(64);

        let bindings = SoftBindings::new(&vao, &pipeline)
            .with_texture(0, &texture)
            .with_uniform_buffer(1, &uniforms);
        assert_eq!(bindings.bound_textures().count(), 1);
        assert_eq!(bindings.bound_uniforms().map(|(slot, _)| slot).collect::<Vec<_>>(), vec![1]);

        let mut queue = instance.create_command_queue();
        queue.draw(0, 3, &bindings);
        assert!(instance.back_buffer().pixels().all(|p| p == RED));
    }

    #[test]
    fn backend_reports_the_version_floor() {
        let instance = instance();
        let info = instance.backend_info();
        assert_eq!(info.name, "software");
        assert!(duskforge_render::check_version(info.version).is_ok());
        assert_eq!(instance.drawable_size(), (8, 8));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "exceed")]
    fn drawing_past_the_vertex_buffer_is_a_contract_violation() {
        let instance = instance();
        let vao = mesh(&instance, &full_screen(RED), &[]);
        let pipeline = pipeline(&instance, vec![vertex_layout()]);
        let mut queue = instance.create_command_queue();
        queue.draw(1, 3, &SoftBindings::new(&vao, &pipeline));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "expects different vertex layouts")]
    fn pipeline_layout_mismatch_is_a_contract_violation() {
        let instance = instance();
        let vao = mesh(&instance, &full_screen(RED), &[]);
        let pipeline = pipeline(&instance, vec![VertexLayout::per_vertex([Format::Float32x3])]);
        let mut queue = instance.create_command_queue();
        queue.draw(0, 3, &SoftBindings::new(&vao, &pipeline));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "without an index buffer")]
    fn indexed_draw_needs_an_index_buffer() {
        let instance = instance();
        let vao = mesh(&instance, &full_screen(RED), &[]);
        let pipeline = pipeline(&instance, vec![vertex_layout()]);
        let mut queue = instance.create_command_queue();
        queue.draw_indexed(0, 3, &SoftBindings::new(&vao, &pipeline));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "out of range")]
    fn index_values_must_address_existing_vertices() {
        let instance = instance();
        let vao = mesh(&instance, &full_screen(RED), &[0, 1, 5]);
        let pipeline = pipeline(&instance, vec![vertex_layout()]);
        let mut queue = instance.create_command_queue();
        queue.draw_indexed(0, 3, &SoftBindings::new(&vao, &pipeline));
    }
}
