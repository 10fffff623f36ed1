/// One accumulation pipeline per light kind.
///
/// All three share the quad vertex stage and bind groups; only the fragment
/// shader differs.  Blending is additive (`One + One`) and there is no
/// depth attachment, so each light adds onto the lit image regardless of
/// draw order.
use lucerna_core::LightKind;

use crate::pipeline::{validate, PipelineLayouts};
use crate::quad::QuadVertex;

const POINT_SRC: &str = concat!(
    include_str!("../../../../assets/shaders/light_common.wgsl"),
    include_str!("../../../../assets/shaders/light_point.wgsl"),
);
const SPOT_SRC: &str = concat!(
    include_str!("../../../../assets/shaders/light_common.wgsl"),
    include_str!("../../../../assets/shaders/light_spot.wgsl"),
);
const DIRECTIONAL_SRC: &str = concat!(
    include_str!("../../../../assets/shaders/light_common.wgsl"),
    include_str!("../../../../assets/shaders/light_directional.wgsl"),
);

pub const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

pub struct LightPipelines {
    point: wgpu::RenderPipeline,
    spot: wgpu::RenderPipeline,
    directional: wgpu::RenderPipeline,
}

impl LightPipelines {
    pub fn new(device: &wgpu::Device, layouts: &PipelineLayouts, output_format: wgpu::TextureFormat) -> Self {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Light Pipeline Layout"),
            bind_group_layouts: &[&layouts.gbuffer, &layouts.light_batch, &layouts.light_params],
            push_constant_ranges: &[],
        });

        let build = |kind: LightKind, source: &'static str| {
            let label = format!("{} light", kind.label());
            let shader = validate::shader(device, &label, source);
            validate::validated(device, &label, || {
                device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some(&label),
                    layout: Some(&layout),
                    vertex: wgpu::VertexState {
                        module: &shader,
                        entry_point: Some("vs_main"),
                        buffers: &[QuadVertex::layout()],
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &shader,
                        entry_point: Some("fs_main"),
                        targets: &[Some(wgpu::ColorTargetState {
                            format: output_format,
                            blend: Some(ADDITIVE),
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                    }),
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        cull_mode: None,
                        ..Default::default()
                    },
                    depth_stencil: None,
                    multisample: wgpu::MultisampleState::default(),
                    multiview: None,
                    cache: None,
                })
            })
        };

        Self {
            point: build(LightKind::Point, POINT_SRC),
            spot: build(LightKind::Spot, SPOT_SRC),
            directional: build(LightKind::Directional, DIRECTIONAL_SRC),
        }
    }

    pub fn get(&self, kind: LightKind) -> &wgpu::RenderPipeline {
        match kind {
            LightKind::Point => &self.point,
            LightKind::Spot => &self.spot,
            LightKind::Directional => &self.directional,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::BlitPipelines;
    use crate::EngineContext;

    #[test]
    fn light_shaders_read_depth_as_float() {
        for source in [POINT_SRC, SPOT_SRC, DIRECTIONAL_SRC, include_str!("../../../../assets/shaders/blit.wgsl")] {
            assert!(!source.contains("texture_depth_2d"));
            assert!(source.contains("var gbuf_depth: texture_2d<f32>;"));
        }
    }

    #[test]
    fn pipelines_build_on_the_gl_backend() {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::GL,
            ..Default::default()
        });
        let Ok(ctx) = pollster::block_on(EngineContext::new_with_instance(instance, None)) else {
            eprintln!("no GL adapter; skipping");
            return;
        };
        let layouts = PipelineLayouts::new(&ctx.device);
        let format = wgpu::TextureFormat::Rgba8UnormSrgb;
        let lights = LightPipelines::new(&ctx.device, &layouts, format);
        let _ = lights.get(LightKind::Directional);
        let _ = BlitPipelines::new(&ctx.device, &layouts, format);
    }
}
