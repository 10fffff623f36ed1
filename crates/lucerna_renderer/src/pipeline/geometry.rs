/// Geometry-stage pipeline: fills the colour and normal G-buffer targets
/// with depth testing and writing enabled.
use std::sync::Arc;

use crate::geometry::Vertex;
use crate::pipeline::{validate, PipelineLayouts};
use crate::render_target::GBuffer;

#[derive(Clone)]
pub struct GeometryPipeline {
    pub inner: Arc<wgpu::RenderPipeline>,
}

impl GeometryPipeline {
    pub fn new(device: &wgpu::Device, layouts: &PipelineLayouts) -> Self {
        let shader = validate::shader(
            device,
            "gbuffer.wgsl",
            include_str!("../../../../assets/shaders/gbuffer.wgsl"),
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Geometry Pipeline Layout"),
            bind_group_layouts: &[&layouts.object, &layouts.material],
            push_constant_ranges: &[],
        });

        let target = |format| {
            Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })
        };

        let pipeline = validate::validated(device, "Geometry Pipeline", || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Geometry Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex::layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[target(GBuffer::COLOR_FORMAT), target(GBuffer::NORMAL_FORMAT)],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: GBuffer::DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        });

        Self {
            inner: Arc::new(pipeline),
        }
    }
}
