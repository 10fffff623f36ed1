use lucerna_core::{Camera, Time};
use lucerna_renderer::{FrameStats, Renderer, ResourceRegistry, SceneContents};
use winit::window::Window;

use crate::input::InputState;

/// Per-frame context passed to every [`LucernaApp`](crate::LucernaApp)
/// callback.
pub struct AppContext<'a> {
    // ── Read-only ──────────────────────────────────────────────────────────
    /// Keyboard and mouse state for this frame.
    pub input: &'a mut InputState,

    /// Frame timing: delta, elapsed, FPS.
    pub time: Time,

    /// Current window size in physical pixels.
    pub window_size: (u32, u32),

    pub window: &'a Window,

    // ── Read-write ─────────────────────────────────────────────────────────
    /// Available in `setup`, `update` and `on_resize`; `None` in
    /// `draw_3d`, which receives the renderer through [`Frame`].
    pub renderer: Option<&'a mut Renderer>,

    /// Owner of meshes, textures and materials.  Same availability as
    /// `renderer`.
    pub registry: Option<&'a mut ResourceRegistry>,

    pub(crate) exit_requested: bool,
}

impl<'a> AppContext<'a> {
    /// Signal the event loop to shut down after the current frame.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn renderer(&mut self) -> Option<&mut Renderer> {
        self.renderer.as_deref_mut()
    }

    pub fn registry(&mut self) -> Option<&mut ResourceRegistry> {
        self.registry.as_deref_mut()
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.window_size.0
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.window_size.1
    }

    /// Aspect ratio (width / height). Returns 1.0 if height is zero.
    #[inline]
    pub fn aspect(&self) -> f32 {
        let (w, h) = self.window_size;
        if h == 0 { 1.0 } else { w as f32 / h as f32 }
    }
}

/// The frame being recorded, handed to
/// [`LucernaApp::draw_3d`](crate::LucernaApp::draw_3d).
pub struct Frame<'a> {
    pub renderer: &'a mut Renderer,
    pub registry: &'a ResourceRegistry,
    pub(crate) encoder: &'a mut wgpu::CommandEncoder,
    pub(crate) view: &'a wgpu::TextureView,
    pub(crate) stats: Option<FrameStats>,
}

impl Frame<'_> {
    /// Renders `scene` from `camera` into the window.  Call at most once per
    /// frame; a frame the app does not render is cleared.
    pub fn render(&mut self, camera: &Camera, scene: SceneContents<'_>) -> FrameStats {
        if self.stats.is_some() {
            log::warn!("Frame::render called twice; the second call overwrites the first");
        }
        let stats = self
            .renderer
            .render_frame(self.encoder, self.view, self.registry, camera, scene);
        self.stats = Some(stats);
        stats
    }

    pub fn stats(&self) -> Option<FrameStats> {
        self.stats
    }
}
