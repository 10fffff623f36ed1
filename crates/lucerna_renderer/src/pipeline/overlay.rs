/// Forward overlay pipelines.  Both test against the G-buffer depth, which
/// the forward stage attaches read-only, and neither blends.
use crate::geometry::Vertex;
use crate::pipeline::{validate, PipelineLayouts};
use crate::render_target::GBuffer;

fn depth_state(compare: wgpu::CompareFunction) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: GBuffer::DEPTH_FORMAT,
        depth_write_enabled: false,
        depth_compare: compare,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

fn opaque_target(format: wgpu::TextureFormat) -> [Option<wgpu::ColorTargetState>; 1] {
    [Some(wgpu::ColorTargetState {
        format,
        blend: Some(wgpu::BlendState::REPLACE),
        write_mask: wgpu::ColorWrites::ALL,
    })]
}

// ─── Wireframes ────────────────────────────────────────────────────────────

/// Line-list pipeline for collider and light-volume boxes.
pub struct WirePipeline {
    pub inner: wgpu::RenderPipeline,
}

impl WirePipeline {
    pub fn new(device: &wgpu::Device, layouts: &PipelineLayouts, output_format: wgpu::TextureFormat) -> Self {
        let shader = validate::shader(device, "unlit.wgsl", include_str!("../../../../assets/shaders/unlit.wgsl"));
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Wire Pipeline Layout"),
            bind_group_layouts: &[&layouts.wire],
            push_constant_ranges: &[],
        });

        let inner = validate::validated(device, "Wire Pipeline", || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Wire Pipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex::layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &opaque_target(output_format),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::LineList,
                    ..Default::default()
                },
                depth_stencil: Some(depth_state(wgpu::CompareFunction::LessEqual)),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        });

        Self { inner }
    }
}

// ─── Skybox ────────────────────────────────────────────────────────────────

/// Full-screen triangle at the far plane; only pixels whose depth is still
/// the cleared 1.0 pass the test.
pub struct SkyPipeline {
    pub inner: wgpu::RenderPipeline,
}

impl SkyPipeline {
    pub fn new(device: &wgpu::Device, layouts: &PipelineLayouts, output_format: wgpu::TextureFormat) -> Self {
        let shader = validate::shader(device, "skybox.wgsl", include_str!("../../../../assets/shaders/skybox.wgsl"));
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sky Pipeline Layout"),
            bind_group_layouts: &[&layouts.sky],
            push_constant_ranges: &[],
        });

        let inner = validate::validated(device, "Sky Pipeline", || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Sky Pipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &opaque_target(output_format),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: Some(depth_state(wgpu::CompareFunction::LessEqual)),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        });

        Self { inner }
    }
}
