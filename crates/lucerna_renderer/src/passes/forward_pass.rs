/// Forward overlay drawn over the lit image.
///
/// The G-buffer depth is attached with `LoadOp::Load`, so the backdrop and
/// the debug wireframes are depth tested against the deferred geometry
/// without copying depth anywhere.
use std::sync::Arc;

use wgpu::{
    CommandEncoder, Device, LoadOp, Operations, Queue, RenderPassColorAttachment,
    RenderPassDepthStencilAttachment, RenderPassDescriptor, StoreOp,
};

use crate::geometry::{primitives, Mesh};
use crate::graph::{FramePacket, FrameTargets, RenderStage};
use crate::pipeline::uniforms::WireUniform;
use crate::pipeline::{PipelineLayouts, WirePipeline};
use crate::resources::UniformArray;

pub struct ForwardStage {
    pipeline: WirePipeline,
    wires: UniformArray<WireUniform>,
    wire_layout: Arc<wgpu::BindGroupLayout>,
    cube: Mesh,
}

impl ForwardStage {
    pub fn new(device: &Device, layouts: &PipelineLayouts, output_format: wgpu::TextureFormat) -> Self {
        Self {
            pipeline: WirePipeline::new(device, layouts, output_format),
            wires: UniformArray::new(device, &layouts.wire, "Wire Uniforms", 16),
            wire_layout: layouts.wire.clone(),
            cube: primitives::wire_cube(device),
        }
    }
}

impl RenderStage for ForwardStage {
    fn name(&self) -> &str {
        "Forward Overlay Pass"
    }

    fn prepare(&mut self, device: &Device, queue: &Queue, packet: &FramePacket) {
        self.wires.ensure_capacity(device, &self.wire_layout, packet.wires.len());
        for (i, wire) in packet.wires.iter().enumerate() {
            let uniform = WireUniform {
                mvp: wire.mvp.to_cols_array_2d(),
                color: wire.color.to_array(),
            };
            self.wires.write(queue, i, &uniform);
        }
    }

    fn execute(&mut self, encoder: &mut CommandEncoder, targets: &FrameTargets<'_>, packet: &FramePacket) {
        if targets.backdrop.is_none() && packet.wires.is_empty() {
            return;
        }

        let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some(self.name()),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: targets.output,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Load,
                    store: StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                view: targets.gbuffer.depth_view(),
                depth_ops: Some(Operations {
                    load: LoadOp::Load,
                    store: StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        if let Some(backdrop) = targets.backdrop {
            backdrop.render(&mut rpass);
        }

        if packet.wires.is_empty() {
            return;
        }
        rpass.set_pipeline(&self.pipeline.inner);
        rpass.set_vertex_buffer(0, self.cube.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.cube.index_buffer.slice(..), self.cube.index_format);
        for i in 0..packet.wires.len() {
            rpass.set_bind_group(0, self.wires.bind_group(), &[self.wires.offset(i)]);
            rpass.draw_indexed(0..self.cube.index_count, 0, 0..1);
        }
    }
}
