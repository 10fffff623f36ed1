use std::sync::Arc;

use anyhow::Context as _;
use lucerna_renderer::{EngineContext, Renderer, RendererConfig};
use winit::window::Window;

pub struct GraphicsState {
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
    pub renderer: Renderer,
}

impl GraphicsState {
    pub async fn new(window: Arc<Window>, vsync: bool, renderer_config: RendererConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        // an Arc'd window satisfies the 'static surface target bound
        let surface = instance.create_surface(window).context("creating window surface")?;
        let context = EngineContext::new_with_instance(instance, Some(&surface)).await?;

        let caps = surface.get_capabilities(&context.adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .context("surface reports no formats")?;
        let present_mode = if vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 1,
        };
        surface.configure(&context.device, &config);
        log::info!("surface {}x{} {:?} {:?}", config.width, config.height, format, present_mode);

        let renderer = Renderer::new(context, config.width, config.height, config.format, renderer_config);

        Ok(Self {
            surface,
            config,
            renderer,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface
                .configure(&self.renderer.context.device, &self.config);
            self.renderer.on_resize_window(width, height);
        }
    }

    /// Next swapchain texture.  A lost or outdated surface is reconfigured
    /// and the frame skipped.
    pub fn acquire(&mut self) -> Option<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(frame) => Some(frame),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost; reconfiguring");
                self.surface
                    .configure(&self.renderer.context.device, &self.config);
                None
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface timeout; skipping frame");
                None
            }
            Err(err) => lucerna_renderer::error::fatal("acquiring surface texture", err),
        }
    }
}
