/// Vertical colour gradient used as the default [`Backdrop`].
use std::sync::Arc;

use glam::Mat4;
use lucerna_core::Color;

use crate::pipeline::uniforms::SkyUniform;
use crate::pipeline::{PipelineLayouts, SkyPipeline};
use crate::resources::buffer;
use crate::scene::Backdrop;

pub struct GradientSkybox {
    pipeline: SkyPipeline,
    uniform: SkyUniform,
    buffer: Arc<wgpu::Buffer>,
    bind_group: wgpu::BindGroup,
}

impl GradientSkybox {
    pub fn new(
        device: &wgpu::Device,
        layouts: &PipelineLayouts,
        output_format: wgpu::TextureFormat,
        zenith: Color,
        horizon: Color,
        ground: Color,
    ) -> Self {
        let pipeline = SkyPipeline::new(device, layouts, output_format);
        let uniform = SkyUniform {
            inv_view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            zenith: zenith.to_array(),
            horizon: horizon.to_array(),
            ground: ground.to_array(),
        };
        let buffer = buffer::create_uniform(device, "Sky Uniform", &uniform);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sky BindGroup"),
            layout: &layouts.sky,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self {
            pipeline,
            uniform,
            buffer,
            bind_group,
        }
    }
}

impl Backdrop for GradientSkybox {
    fn prepare(&mut self, queue: &wgpu::Queue, projection: Mat4, view: Mat4) {
        // drop the translation so the sky stays at infinity
        let rotation_only = Mat4::from_mat3(glam::Mat3::from_mat4(view));
        self.uniform.inv_view_proj = (projection * rotation_only).inverse().to_cols_array_2d();
        buffer::update_uniform(queue, &self.buffer, &self.uniform);
    }

    fn render(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_pipeline(&self.pipeline.inner);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.draw(0..3, 0..1);
    }
}
