use crate::context::{AppContext, Frame};

/// The trait every lucerna application implements.
///
/// All methods have empty default implementations so you only override what
/// you need.
#[allow(unused_variables)]
pub trait LucernaApp {
    /// Called once after the window, GPU and registry are ready.
    ///
    /// Create meshes, materials and textures here through `ctx.registry`.
    fn setup(&mut self, ctx: &mut AppContext) {}

    /// Called every frame before rendering.  Scene logic, input handling and
    /// debug-draw requests go here.
    fn update(&mut self, ctx: &mut AppContext) {}

    /// Record this frame's 3-D scene with [`Frame::render`].
    fn draw_3d(&mut self, frame: &mut Frame, ctx: &mut AppContext) {}

    /// Called whenever the window is resized.  The surface and the renderer
    /// have already been told about the new size.
    fn on_resize(&mut self, new_size: (u32, u32), ctx: &mut AppContext) {}

    /// Called for every raw winit `WindowEvent`, after input state has been
    /// updated from it.
    fn on_window_event(&mut self, event: &winit::event::WindowEvent, ctx: &mut AppContext) {}
}
