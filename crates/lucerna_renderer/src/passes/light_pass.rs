/// Deferred light accumulation.
///
/// One screen-space quad per visible light, drawn with additive blending
/// into the output.  The batch uniform (`screen_to_world`, eye, screen size)
/// is shared by all three light programs; per-light parameters sit in a
/// dynamic uniform array.
///
/// Each shrunk quad gets its own slot in the [`QuadBuffer`]: slot `i + 1`
/// belongs to light `i`, slot 0 stays full screen for directional lights
/// and immersed volumes.
use std::sync::Arc;

use lucerna_core::{LightKind, ScreenRect};
use wgpu::{
    CommandEncoder, Device, LoadOp, Operations, Queue, RenderPassColorAttachment, RenderPassDescriptor,
    StoreOp,
};

use crate::graph::{FramePacket, FrameTargets, RenderStage};
use crate::pipeline::uniforms::{GpuLight, LightBatch};
use crate::pipeline::{LightPipelines, PipelineLayouts};
use crate::quad::{QuadBuffer, ScreenQuad, FULLSCREEN_SLOT, QUAD_INDICES};
use crate::resources::{buffer, UniformArray};

pub struct LightStage {
    pipelines: LightPipelines,
    batch: LightBatch,
    batch_buffer: Arc<wgpu::Buffer>,
    batch_bind_group: wgpu::BindGroup,
    params: UniformArray<GpuLight>,
    params_layout: Arc<wgpu::BindGroupLayout>,
    quads: QuadBuffer,
    quad: ScreenQuad,
    /// Quad slot chosen for each light this frame.
    slots: Vec<u32>,
}

impl LightStage {
    pub fn new(
        device: &Device,
        layouts: &PipelineLayouts,
        output_format: wgpu::TextureFormat,
        initial_capacity: usize,
    ) -> Self {
        let batch = LightBatch::new(glam::Mat4::IDENTITY, glam::Vec3::ZERO, 1, 1);
        let batch_buffer = buffer::create_uniform(device, "Light Batch", &batch);
        let batch_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Light Batch BindGroup"),
            layout: &layouts.light_batch,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: batch_buffer.as_entire_binding(),
            }],
        });

        Self {
            pipelines: LightPipelines::new(device, layouts, output_format),
            batch,
            batch_buffer,
            batch_bind_group,
            params: UniformArray::new(device, &layouts.light_params, "Light Params", initial_capacity),
            params_layout: layouts.light_params.clone(),
            quads: QuadBuffer::new(device, initial_capacity as u32 + 1),
            quad: ScreenQuad::fullscreen(),
            slots: Vec::with_capacity(initial_capacity),
        }
    }

    /// Quad slot for light `index`.  Uploads the shrunk quad when one is
    /// needed; the region guard puts the CPU quad back to full screen.
    fn place_quad(&mut self, queue: &Queue, index: usize, kind: LightKind, rect: ScreenRect) -> u32 {
        let slot = quad_slot(index, kind, rect);
        if slot != FULLSCREEN_SLOT {
            let region = self.quad.region(rect);
            self.quads.upload(queue, slot, &region);
        }
        slot
    }
}

/// Slot in the [`QuadBuffer`] that light `index` of the frame draws with.
pub fn quad_slot(index: usize, kind: LightKind, rect: ScreenRect) -> u32 {
    if kind == LightKind::Directional || rect == ScreenRect::FULLSCREEN {
        FULLSCREEN_SLOT
    } else {
        index as u32 + 1
    }
}

impl RenderStage for LightStage {
    fn name(&self) -> &str {
        "Light Accumulation Pass"
    }

    fn prepare(&mut self, device: &Device, queue: &Queue, packet: &FramePacket) {
        self.batch = LightBatch::new(
            packet.camera.view_proj,
            packet.camera.eye,
            packet.viewport.width,
            packet.viewport.height,
        );
        buffer::update_uniform(queue, &self.batch_buffer, &self.batch);

        let count = packet.lights.len();
        self.params.ensure_capacity(device, &self.params_layout, count);
        self.quads.ensure_capacity(device, count as u32 + 1);

        self.slots.clear();
        for (i, light) in packet.lights.iter().enumerate() {
            self.params.write(queue, i, &light.params);
            let slot = self.place_quad(queue, i, light.kind, light.rect);
            self.slots.push(slot);
        }
        debug_assert!(self.quad.is_fullscreen());
    }

    fn execute(&mut self, encoder: &mut CommandEncoder, targets: &FrameTargets<'_>, packet: &FramePacket) {
        let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some(self.name()),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: targets.output,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Clear(packet.clear_color),
                    store: StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        if packet.lights.is_empty() {
            return;
        }

        rpass.set_bind_group(0, targets.gbuffer.bind_group(), &[]);
        rpass.set_bind_group(1, &self.batch_bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quads.vertex_buffer().slice(..));
        rpass.set_index_buffer(self.quads.index_buffer().slice(..), wgpu::IndexFormat::Uint16);

        let mut bound: Option<LightKind> = None;
        for (i, (light, &slot)) in packet.lights.iter().zip(&self.slots).enumerate() {
            if bound != Some(light.kind) {
                rpass.set_pipeline(self.pipelines.get(light.kind));
                bound = Some(light.kind);
            }
            rpass.set_bind_group(2, self.params.bind_group(), &[self.params.offset(i)]);
            rpass.draw_indexed(0..QUAD_INDICES.len() as u32, QuadBuffer::base_vertex(slot), 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec2, Vec3};
    use lucerna_core::{DirectionalLight, PointLight};

    use crate::graph::{CameraPacket, LightDraw, Viewport};
    use crate::EngineContext;

    fn shrunk() -> ScreenRect {
        ScreenRect::new(Vec2::new(-0.25, -0.5), Vec2::new(0.5, 0.25))
    }

    #[test]
    fn directional_and_immersed_lights_share_the_fullscreen_slot() {
        assert_eq!(quad_slot(3, LightKind::Directional, shrunk()), FULLSCREEN_SLOT);
        assert_eq!(quad_slot(0, LightKind::Point, ScreenRect::FULLSCREEN), FULLSCREEN_SLOT);
        assert_eq!(quad_slot(5, LightKind::Spot, ScreenRect::FULLSCREEN), FULLSCREEN_SLOT);
    }

    #[test]
    fn shrunk_light_uses_the_slot_after_its_index() {
        assert_eq!(quad_slot(0, LightKind::Point, shrunk()), 1);
        assert_eq!(quad_slot(4, LightKind::Spot, shrunk()), 5);
    }

    #[test]
    fn prepare_assigns_slots_and_leaves_the_quad_fullscreen() {
        let Some(ctx) = pollster::block_on(EngineContext::new()).ok() else {
            eprintln!("no GPU adapter; skipping");
            return;
        };
        let layouts = PipelineLayouts::new(&ctx.device);
        // capacity 1 forces both the uniform array and the quad buffer to grow
        let mut stage = LightStage::new(&ctx.device, &layouts, wgpu::TextureFormat::Rgba8UnormSrgb, 1);

        let point = PointLight::new(Vec3::ZERO);
        let draw = |kind, params, rect| LightDraw { kind, params, rect };
        let packet = FramePacket {
            viewport: Viewport {
                width: 64,
                height: 64,
            },
            camera: CameraPacket::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::ZERO),
            geometry: Vec::new(),
            lights: vec![
                draw(LightKind::Point, GpuLight::from(&point), shrunk()),
                draw(LightKind::Point, GpuLight::from(&point), ScreenRect::FULLSCREEN),
                draw(LightKind::Spot, GpuLight::from(&point), shrunk()),
                draw(LightKind::Directional, GpuLight::from(&DirectionalLight::default()), ScreenRect::FULLSCREEN),
            ],
            wires: Vec::new(),
            show_gbuffer: false,
            clear_color: wgpu::Color::BLACK,
        };

        stage.prepare(&ctx.device, &ctx.queue, &packet);

        assert_eq!(stage.slots, vec![1, FULLSCREEN_SLOT, 3, FULLSCREEN_SLOT]);
        assert!(stage.quad.is_fullscreen());
        assert!(stage.quads.capacity() >= 5);
    }
}
