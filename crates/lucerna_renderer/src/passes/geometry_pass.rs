/// Deferred geometry stage.
///
/// Clears the G-buffer and writes albedo/specular, world normals and depth
/// for every resolved draw.  Per-object matrices live in one dynamic uniform
/// array; each draw selects its slot by offset.
use std::sync::Arc;

use wgpu::{
    CommandEncoder, Device, LoadOp, Operations, Queue, RenderPassColorAttachment,
    RenderPassDepthStencilAttachment, RenderPassDescriptor, StoreOp,
};

use crate::graph::{FramePacket, FrameTargets, RenderStage};
use crate::pipeline::uniforms::ObjectUniform;
use crate::pipeline::{GeometryPipeline, PipelineLayouts};
use crate::resources::UniformArray;

pub struct GeometryStage {
    pipeline: GeometryPipeline,
    objects: UniformArray<ObjectUniform>,
    object_layout: Arc<wgpu::BindGroupLayout>,
}

impl GeometryStage {
    pub fn new(device: &Device, layouts: &PipelineLayouts, initial_capacity: usize) -> Self {
        Self {
            pipeline: GeometryPipeline::new(device, layouts),
            objects: UniformArray::new(device, &layouts.object, "Object Uniforms", initial_capacity),
            object_layout: layouts.object.clone(),
        }
    }
}

impl RenderStage for GeometryStage {
    fn name(&self) -> &str {
        "Geometry Pass"
    }

    fn prepare(&mut self, device: &Device, queue: &Queue, packet: &FramePacket) {
        self.objects
            .ensure_capacity(device, &self.object_layout, packet.geometry.len());
        for (i, draw) in packet.geometry.iter().enumerate() {
            self.objects
                .write(queue, i, &ObjectUniform::new(packet.camera.view_proj, draw.model));
        }
    }

    fn execute(&mut self, encoder: &mut CommandEncoder, targets: &FrameTargets<'_>, packet: &FramePacket) {
        let clear = |view| {
            Some(RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: StoreOp::Store,
                },
            })
        };

        let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some(self.name()),
            color_attachments: &[clear(targets.gbuffer.color_view()), clear(targets.gbuffer.normal_view())],
            depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                view: targets.gbuffer.depth_view(),
                depth_ops: Some(Operations {
                    load: LoadOp::Clear(1.0),
                    store: StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        rpass.set_pipeline(&self.pipeline.inner);
        for (i, draw) in packet.geometry.iter().enumerate() {
            rpass.set_bind_group(0, self.objects.bind_group(), &[self.objects.offset(i)]);
            rpass.set_bind_group(1, &*draw.material, &[]);
            rpass.set_vertex_buffer(0, draw.mesh.vertex_buffer.slice(..));
            rpass.set_index_buffer(draw.mesh.index_buffer.slice(..), draw.mesh.index_format);
            rpass.draw_indexed(0..draw.mesh.index_count, 0, 0..1);
        }
    }
}
