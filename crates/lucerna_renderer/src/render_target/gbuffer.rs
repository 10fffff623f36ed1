/// Geometry buffer: the three render targets the geometry stage writes and
/// the light stage reads.
///
/// | Binding | Attachment | Format         | Contents                          |
/// |---------|------------|----------------|-----------------------------------|
/// | 0       | colour     | `Rgba8Unorm`   | linear albedo, alpha = specular   |
/// | 1       | normal     | `Rgba16Float`  | world-space normal                |
/// | 2       | depth      | `Depth32Float` | hardware depth, sampled by lights |
///
/// Attachments are recreated, never resized in place.  The bind group that
/// exposes them is rebuilt alongside and `generation` is bumped, so cached
/// references to an older bind group can be detected.
use std::sync::Arc;

use crate::resources::texture::{self, RenderTextureDesc};

pub struct GBuffer {
    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    normal: wgpu::Texture,
    normal_view: wgpu::TextureView,
    depth: wgpu::Texture,
    depth_view: wgpu::TextureView,
    bind_group: Arc<wgpu::BindGroup>,
    layout: Arc<wgpu::BindGroupLayout>,
    width: u32,
    height: u32,
    generation: u64,
}

impl GBuffer {
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
    pub const NORMAL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// `layout` is [`crate::pipeline::PipelineLayouts::gbuffer`].
    pub fn new(device: &wgpu::Device, layout: Arc<wgpu::BindGroupLayout>, width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let color = make_target(device, "G-Buffer Color", Self::COLOR_FORMAT, width, height);
        let normal = make_target(device, "G-Buffer Normal", Self::NORMAL_FORMAT, width, height);
        let depth = make_target(device, "G-Buffer Depth", Self::DEPTH_FORMAT, width, height);
        let color_view = texture::default_view(&color);
        let normal_view = texture::default_view(&normal);
        let depth_view = texture::default_view(&depth);
        let bind_group = create_bind_group(device, &layout, &color_view, &normal_view, &depth_view);

        let gbuffer = Self {
            color,
            color_view,
            normal,
            normal_view,
            depth,
            depth_view,
            bind_group: Arc::new(bind_group),
            layout,
            width,
            height,
            generation: 0,
        };
        gbuffer.assert_complete();
        gbuffer
    }

    /// Recreate every attachment at the new size and rebuild the bind group.
    ///
    /// Zero-sized requests (minimised windows) keep the current targets.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("G-buffer resize to {width}x{height} ignored");
            return;
        }
        let generation = self.generation + 1;
        let layout = self.layout.clone();
        *self = crate::pipeline::validate::validated(device, "G-Buffer", || {
            Self::new(device, layout, width, height)
        });
        self.generation = generation;
        log::debug!("G-buffer recreated at {width}x{height} (generation {generation})");
    }

    /// Every attachment exists with the same non-zero size.
    pub fn is_complete(&self) -> bool {
        let expected = (self.width, self.height);
        self.width > 0
            && self.height > 0
            && [&self.color, &self.normal, &self.depth]
                .iter()
                .all(|t| (t.width(), t.height()) == expected)
    }

    fn assert_complete(&self) {
        if !self.is_complete() {
            crate::error::fatal(
                "G-buffer incomplete",
                format_args!(
                    "color {}x{}, normal {}x{}, depth {}x{}, expected {}x{}",
                    self.color.width(),
                    self.color.height(),
                    self.normal.width(),
                    self.normal.height(),
                    self.depth.width(),
                    self.depth.height(),
                    self.width,
                    self.height,
                ),
            );
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    #[inline]
    pub fn normal_view(&self) -> &wgpu::TextureView {
        &self.normal_view
    }

    #[inline]
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Colour, normal and depth as bindings 0, 1 and 2.
    #[inline]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

fn make_target(device: &wgpu::Device, label: &str, format: wgpu::TextureFormat, width: u32, height: u32) -> wgpu::Texture {
    texture::create_render_texture(device, &RenderTextureDesc {
        label,
        width,
        height,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
    })
}

fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    color: &wgpu::TextureView,
    normal: &wgpu::TextureView,
    depth: &wgpu::TextureView,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("G-Buffer BindGroup"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(color),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(normal),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(depth),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::EngineContext;
    use crate::pipeline::PipelineLayouts;

    fn headless() -> Option<EngineContext> {
        pollster::block_on(EngineContext::new()).ok()
    }

    #[test]
    fn resize_recreates_complete_attachments() {
        let Some(ctx) = headless() else {
            eprintln!("no GPU adapter; skipping");
            return;
        };
        let layouts = PipelineLayouts::new(&ctx.device);
        let mut gbuffer = GBuffer::new(&ctx.device, layouts.gbuffer.clone(), 64, 48);
        assert!(gbuffer.is_complete());
        assert_eq!(gbuffer.generation(), 0);

        gbuffer.resize(&ctx.device, 200, 120);
        assert!(gbuffer.is_complete());
        assert_eq!((gbuffer.width(), gbuffer.height()), (200, 120));
        assert_eq!(gbuffer.generation(), 1);
        assert_eq!(gbuffer.depth.width(), 200);
        assert_eq!(gbuffer.normal.height(), 120);
    }

    #[test]
    fn zero_size_resize_keeps_targets() {
        let Some(ctx) = headless() else {
            eprintln!("no GPU adapter; skipping");
            return;
        };
        let layouts = PipelineLayouts::new(&ctx.device);
        let mut gbuffer = GBuffer::new(&ctx.device, layouts.gbuffer.clone(), 32, 32);
        gbuffer.resize(&ctx.device, 0, 32);
        assert_eq!((gbuffer.width(), gbuffer.height()), (32, 32));
        assert_eq!(gbuffer.generation(), 0);
    }
}
