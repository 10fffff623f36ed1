/// Shared `wgpu::BindGroupLayout` objects used by several pipelines.
/// Centralising them here means the G-buffer, the registry and every stage
/// build bind groups against the *same* layout objects.
use std::sync::Arc;

use crate::pipeline::uniforms::{GpuLight, LightBatch, ObjectUniform, SkyUniform, WireUniform};
use crate::resources::registry::MaterialUniform;

/// All bind-group layouts used by the built-in pipelines.
#[derive(Clone)]
pub struct PipelineLayouts {
    /// Geometry group(0): per-object matrices, **dynamic** offset.
    pub object: Arc<wgpu::BindGroupLayout>,
    /// Geometry group(1): albedo texture, sampler, material uniform.
    pub material: Arc<wgpu::BindGroupLayout>,
    /// Light / debug group(0): G-buffer colour, normal, depth.
    pub gbuffer: Arc<wgpu::BindGroupLayout>,
    /// Light group(1): per-frame batch constants.
    pub light_batch: Arc<wgpu::BindGroupLayout>,
    /// Light group(2): per-light parameters, **dynamic** offset.
    pub light_params: Arc<wgpu::BindGroupLayout>,
    /// Overlay group(0): per-wireframe MVP and colour, **dynamic** offset.
    pub wire: Arc<wgpu::BindGroupLayout>,
    /// Skybox group(0).
    pub sky: Arc<wgpu::BindGroupLayout>,
}

fn uniform_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    dynamic: bool,
    size: usize,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: dynamic,
            min_binding_size: wgpu::BufferSize::new(size as u64),
        },
        count: None,
    }
}

/// G-buffer textures are read with `textureLoad`, so they are declared
/// unfilterable and need no sampler.  Depth is bound as plain `f32` too:
/// the GL backend cannot `textureLoad` from a `texture_depth_2d`.
fn gbuffer_texture_entry(binding: u32, sample_type: wgpu::TextureSampleType) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type,
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

impl PipelineLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        use std::mem::size_of;
        let vs = wgpu::ShaderStages::VERTEX;
        let fs = wgpu::ShaderStages::FRAGMENT;
        let both = wgpu::ShaderStages::VERTEX_FRAGMENT;

        let layout = |label: &str, entries: &[wgpu::BindGroupLayoutEntry]| {
            Arc::new(device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(label),
                entries,
            }))
        };

        let object = layout(
            "Layout: Object (dynamic)",
            &[uniform_entry(0, vs, true, size_of::<ObjectUniform>())],
        );

        let material = layout(
            "Layout: Material",
            &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: fs,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: fs,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                uniform_entry(2, fs, false, size_of::<MaterialUniform>()),
            ],
        );

        let unfilterable = wgpu::TextureSampleType::Float { filterable: false };
        let gbuffer = layout(
            "Layout: G-Buffer",
            &[
                gbuffer_texture_entry(0, unfilterable),
                gbuffer_texture_entry(1, unfilterable),
                gbuffer_texture_entry(2, unfilterable),
            ],
        );

        let light_batch = layout(
            "Layout: Light Batch",
            &[uniform_entry(0, both, false, size_of::<LightBatch>())],
        );

        let light_params = layout(
            "Layout: Light Params (dynamic)",
            &[uniform_entry(0, fs, true, size_of::<GpuLight>())],
        );

        let wire = layout(
            "Layout: Wire (dynamic)",
            &[uniform_entry(0, both, true, size_of::<WireUniform>())],
        );

        let sky = layout("Layout: Sky", &[uniform_entry(0, both, false, size_of::<SkyUniform>())]);

        Self {
            object,
            material,
            gbuffer,
            light_batch,
            light_params,
            wire,
            sky,
        }
    }
}
