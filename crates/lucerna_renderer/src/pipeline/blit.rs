/// G-buffer debug views: one pipeline per channel, all reading the
/// G-buffer bind group and drawing a full-viewport triangle.
use crate::pipeline::{validate, PipelineLayouts};

/// The channels shown by the debug view, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GBufferChannel {
    Color,
    Normal,
    Depth,
}

impl GBufferChannel {
    pub const ALL: [GBufferChannel; 3] = [GBufferChannel::Color, GBufferChannel::Normal, GBufferChannel::Depth];

    fn entry_point(self) -> &'static str {
        match self {
            GBufferChannel::Color => "fs_color",
            GBufferChannel::Normal => "fs_normal",
            GBufferChannel::Depth => "fs_depth",
        }
    }
}

pub struct BlitPipelines {
    pipelines: [wgpu::RenderPipeline; 3],
}

impl BlitPipelines {
    pub fn new(device: &wgpu::Device, layouts: &PipelineLayouts, output_format: wgpu::TextureFormat) -> Self {
        let shader = validate::shader(device, "blit.wgsl", include_str!("../../../../assets/shaders/blit.wgsl"));
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Blit Pipeline Layout"),
            bind_group_layouts: &[&layouts.gbuffer],
            push_constant_ranges: &[],
        });

        let pipelines = GBufferChannel::ALL.map(|channel| {
            let entry = channel.entry_point();
            validate::validated(device, entry, || {
                device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some(entry),
                    layout: Some(&layout),
                    vertex: wgpu::VertexState {
                        module: &shader,
                        entry_point: Some("vs_main"),
                        buffers: &[],
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &shader,
                        entry_point: Some(entry),
                        targets: &[Some(wgpu::ColorTargetState {
                            format: output_format,
                            blend: Some(wgpu::BlendState::REPLACE),
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                    }),
                    primitive: wgpu::PrimitiveState::default(),
                    depth_stencil: None,
                    multisample: wgpu::MultisampleState::default(),
                    multiview: None,
                    cache: None,
                })
            })
        });

        Self { pipelines }
    }

    pub fn get(&self, channel: GBufferChannel) -> &wgpu::RenderPipeline {
        &self.pipelines[channel as usize]
    }
}
