//! Explicit owner of meshes, textures and materials.
//!
//! Scene code refers to GPU resources through slotmap keys.  A key whose
//! resource has been removed (or that came from another registry) simply
//! fails to resolve; the geometry stage skips such draws instead of
//! crashing.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use lucerna_core::Color;
use slotmap::{new_key_type, SlotMap};

use crate::error::RendererError;
use crate::geometry::{Mesh, Vertex};
use crate::resources::{buffer, texture};

new_key_type! {
    pub struct MeshHandle;
    pub struct TextureHandle;
    pub struct MaterialHandle;
}

/// A sampled colour texture.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

/// Parameters for [`ResourceRegistry::create_material`].
#[derive(Debug, Clone, Copy)]
pub struct MaterialDesc {
    /// `None` uses the registry's 1×1 white texture.
    pub albedo_texture: Option<TextureHandle>,
    /// Multiplied with the texture sample.
    pub albedo: Color,
    /// Written to the G-buffer colour alpha channel.
    pub specular: f32,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            albedo_texture: None,
            albedo: Color::WHITE,
            specular: 0.5,
        }
    }
}

/// Uniform block at `@group(1) @binding(2)` of the geometry shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MaterialUniform {
    pub albedo: [f32; 4],
    pub specular: f32,
    pub _pad: [f32; 3],
}

/// Lit material: an albedo texture, its tint and a specular strength,
/// bound as one group.
pub struct Material {
    pub desc: MaterialDesc,
    pub bind_group: Arc<wgpu::BindGroup>,
    _uniform: Arc<wgpu::Buffer>,
}

pub struct ResourceRegistry {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    material_layout: Arc<wgpu::BindGroupLayout>,
    sampler: wgpu::Sampler,

    meshes: SlotMap<MeshHandle, Mesh>,
    textures: SlotMap<TextureHandle, GpuTexture>,
    materials: SlotMap<MaterialHandle, Material>,

    white: TextureHandle,
}

impl ResourceRegistry {
    /// `material_layout` is the geometry pipeline's group(1) layout.
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        material_layout: Arc<wgpu::BindGroupLayout>,
    ) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Material Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let mut textures = SlotMap::with_key();
        let white_tex = texture::create_rgba8_texture(&device, &queue, "White Texture", 1, 1, &[255; 4]);
        let white = textures.insert(GpuTexture {
            view: texture::default_view(&white_tex),
            texture: white_tex,
            width: 1,
            height: 1,
        });

        Self {
            device,
            queue,
            material_layout,
            sampler,
            meshes: SlotMap::with_key(),
            textures,
            materials: SlotMap::with_key(),
            white,
        }
    }

    // ── Meshes ──────────────────────────────────────────────────────────────

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshHandle {
        self.meshes.insert(mesh)
    }

    pub fn create_mesh(&mut self, label: &str, vertices: &[Vertex], indices: &[u16]) -> MeshHandle {
        let mesh = Mesh::from_data(&self.device, label, vertices, indices);
        self.add_mesh(mesh)
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&Mesh> {
        self.meshes.get(handle)
    }

    pub fn remove_mesh(&mut self, handle: MeshHandle) -> Option<Mesh> {
        self.meshes.remove(handle)
    }

    // ── Textures ────────────────────────────────────────────────────────────

    /// Uploads tightly packed sRGB RGBA8 pixels.
    pub fn add_texture_rgba8(
        &mut self,
        label: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<TextureHandle, RendererError> {
        if width == 0 || height == 0 {
            return Err(RendererError::InvalidSize { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(RendererError::TextureSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        let tex = texture::create_rgba8_texture(&self.device, &self.queue, label, width, height, pixels);
        Ok(self.textures.insert(GpuTexture {
            view: texture::default_view(&tex),
            texture: tex,
            width,
            height,
        }))
    }

    /// Decodes a png/jpeg file into a texture.
    #[cfg(feature = "image")]
    pub fn load_texture(&mut self, path: impl AsRef<std::path::Path>) -> Result<TextureHandle, RendererError> {
        let path = path.as_ref();
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        log::debug!("loaded texture {} ({width}x{height})", path.display());
        self.add_texture_rgba8(&path.display().to_string(), width, height, img.as_raw())
    }

    pub fn texture(&self, handle: TextureHandle) -> Option<&GpuTexture> {
        self.textures.get(handle)
    }

    // ── Materials ───────────────────────────────────────────────────────────

    /// Fails with [`RendererError::MissingTexture`] when the albedo texture
    /// handle does not resolve.
    pub fn create_material(&mut self, desc: MaterialDesc) -> Result<MaterialHandle, RendererError> {
        let tex_handle = desc.albedo_texture.unwrap_or(self.white);
        let tex = self
            .textures
            .get(tex_handle)
            .ok_or(RendererError::MissingTexture(tex_handle))?;

        let uniform = buffer::create_uniform(
            &self.device,
            "Material Uniform",
            &MaterialUniform {
                albedo: desc.albedo.to_array(),
                specular: desc.specular.clamp(0.0, 1.0),
                _pad: [0.0; 3],
            },
        );

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material BindGroup"),
            layout: &self.material_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&tex.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniform.as_entire_binding(),
                },
            ],
        });

        Ok(self.materials.insert(Material {
            desc,
            bind_group: Arc::new(bind_group),
            _uniform: uniform,
        }))
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle)
    }

    pub fn remove_material(&mut self, handle: MaterialHandle) -> Option<Material> {
        self.materials.remove(handle)
    }
}
