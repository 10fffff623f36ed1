//! Application framework for lucerna scenes: window, surface, event loop,
//! input, frame timing and logging.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use lucerna_app::{App, AppContext, Frame, LucernaApp};
//!
//! struct Viewer { /* registry handles, lights, camera */ }
//!
//! impl LucernaApp for Viewer {
//!     fn setup(&mut self, ctx: &mut AppContext) {
//!         let registry = ctx.registry.as_deref_mut().unwrap();
//!         // create meshes and materials
//!     }
//!
//!     fn draw_3d(&mut self, frame: &mut Frame, ctx: &mut AppContext) {
//!         frame.render(&self.camera, self.scene());
//!     }
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     App::new(Viewer::default()).with_title("Viewer").run()
//! }
//! ```

pub mod builder;
pub mod camera;
pub mod context;
mod graphics;
pub mod input;
pub mod logging;
mod runner;
pub mod traits;

pub use builder::{App, AppConfig};
pub use camera::OrbitController;
pub use context::{AppContext, Frame};
pub use input::{InputState, KeyCode, MouseButton};
pub use traits::LucernaApp;

// ── Re-export the most-used lucerna_core primitives ────────────────────────
pub use lucerna_core::{Camera, Color, Time, TimeClock, Transform};
pub use lucerna_renderer::{FrameStats, Renderer, RendererConfig, ResourceRegistry};

// glam math types: re-exported for convenience
pub use lucerna_core::glam::{Mat4, Quat, Vec2, Vec3, Vec4};
