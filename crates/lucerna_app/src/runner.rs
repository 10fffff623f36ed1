use std::sync::Arc;

use anyhow::Context as _;
use lucerna_core::{Camera, TimeClock};
use lucerna_renderer::{ResourceRegistry, SceneContents};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::builder::AppConfig;
use crate::context::{AppContext, Frame};
use crate::graphics::GraphicsState;
use crate::input::InputState;
use crate::traits::LucernaApp;

struct Runner<A: LucernaApp> {
    app: A,
    config: AppConfig,
    window: Option<Arc<Window>>,
    graphics: Option<GraphicsState>,
    registry: Option<ResourceRegistry>,
    input: InputState,
    window_size: (u32, u32),
    clock: TimeClock,
    /// First error raised inside the event loop; returned from `run`.
    error: Option<anyhow::Error>,
}

impl<A: LucernaApp> Runner<A> {
    fn new(app: A, config: AppConfig) -> Self {
        Self {
            app,
            config,
            window: None,
            graphics: None,
            registry: None,
            input: InputState::new(),
            window_size: (0, 0),
            clock: TimeClock::new(),
            error: None,
        }
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = Window::default_attributes()
            .with_title(&self.config.title)
            .with_resizable(self.config.resizable)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.width,
                self.config.height,
            ));
        let window = Arc::new(event_loop.create_window(attributes).context("creating window")?);
        let size = window.inner_size();
        self.window_size = (size.width, size.height);

        let mut gfx = pollster::block_on(GraphicsState::new(
            window.clone(),
            self.config.vsync,
            self.config.renderer.clone(),
        ))?;
        let mut registry = gfx.renderer.new_registry();

        // setup borrows gfx and registry before they move into self
        {
            let mut ctx = AppContext {
                input: &mut self.input,
                time: self.clock.peek(),
                window_size: self.window_size,
                window: &window,
                renderer: Some(&mut gfx.renderer),
                registry: Some(&mut registry),
                exit_requested: false,
            };
            self.app.setup(&mut ctx);
            if ctx.exit_requested {
                event_loop.exit();
            }
        }

        self.window = Some(window);
        self.graphics = Some(gfx);
        self.registry = Some(registry);
        Ok(())
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gfx), Some(registry), Some(window)) = (&mut self.graphics, &mut self.registry, &self.window)
        else {
            return;
        };

        let time = self.clock.tick();

        // ── 1. UPDATE ────────────────────────────────────────────────────────
        {
            let mut ctx = AppContext {
                input: &mut self.input,
                time,
                window_size: self.window_size,
                window,
                renderer: Some(&mut gfx.renderer),
                registry: Some(&mut *registry),
                exit_requested: false,
            };
            self.app.update(&mut ctx);
            if ctx.exit_requested {
                event_loop.exit();
                return;
            }
        }

        // ── 2. DRAW ──────────────────────────────────────────────────────────
        let Some(surface_texture) = gfx.acquire() else {
            window.request_redraw();
            return;
        };
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = gfx.renderer.begin_frame();
        {
            let mut ctx = AppContext {
                input: &mut self.input,
                time,
                window_size: self.window_size,
                window,
                // renderer and registry go through `Frame` here
                renderer: None,
                registry: None,
                exit_requested: false,
            };
            let mut frame = Frame {
                renderer: &mut gfx.renderer,
                registry: &*registry,
                encoder: &mut encoder,
                view: &view,
                stats: None,
            };
            if self.window_size.0 > 0 && self.window_size.1 > 0 {
                self.app.draw_3d(&mut frame, &mut ctx);
            }
            if frame.stats.is_none() {
                // nothing drawn: still clear the output and consume debug requests
                frame.render(
                    &Camera::default(),
                    SceneContents {
                        drawables: &[],
                        terrain: None,
                        point_lights: &mut [],
                        spot_lights: &mut [],
                        directional_lights: &[],
                    },
                );
            }
            if ctx.exit_requested {
                event_loop.exit();
            }
        }
        gfx.renderer.context.queue.submit(Some(encoder.finish()));
        surface_texture.present();

        // ── End-of-frame input cleanup ───────────────────────────────────────
        self.input.end_frame();
        window.request_redraw();
    }
}

impl<A: LucernaApp> ApplicationHandler for Runner<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }
        if let Err(err) = self.init_graphics(event_loop) {
            log::error!("start-up failed: {err:#}");
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_window_event(&event);

        // Forward to user callback
        if let Some(window) = self.window.clone() {
            let mut ctx = AppContext {
                input: &mut self.input,
                time: self.clock.peek(),
                window_size: self.window_size,
                window: &window,
                renderer: self.graphics.as_mut().map(|g| &mut g.renderer),
                registry: self.registry.as_mut(),
                exit_requested: false,
            };
            self.app.on_window_event(&event, &mut ctx);
            if ctx.exit_requested {
                event_loop.exit();
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                let new_size = (size.width, size.height);
                self.window_size = new_size;
                let (Some(gfx), Some(window)) = (&mut self.graphics, self.window.clone()) else {
                    return;
                };
                gfx.resize(size.width, size.height);
                if size.width == 0 || size.height == 0 {
                    return;
                }
                let mut ctx = AppContext {
                    input: &mut self.input,
                    time: self.clock.peek(),
                    window_size: new_size,
                    window: &window,
                    renderer: Some(&mut gfx.renderer),
                    registry: self.registry.as_mut(),
                    exit_requested: false,
                };
                self.app.on_resize(new_size, &mut ctx);
            }
            WindowEvent::RedrawRequested => self.frame(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

pub(crate) fn run_internal<A: LucernaApp + 'static>(config: AppConfig, app: A) -> anyhow::Result<()> {
    let mut runner = Runner::new(app, config);
    let event_loop = EventLoop::new().context("creating event loop")?;
    // Poll = spin the loop as fast as possible; no sleeping between frames.
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut runner).context("running event loop")?;
    match runner.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
