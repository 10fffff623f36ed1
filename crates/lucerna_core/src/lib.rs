//! `lucerna_core`: CPU-side types shared by the renderer, the app runner
//! and game code.
//!
//! Nothing in here touches the GPU (unless the `gpu` feature is enabled for
//! a handful of conversion helpers), which keeps the culling and collider
//! math unit-testable on any machine.

pub mod bounds;
pub mod camera;
pub mod color;
pub mod light;
pub mod ndc;
pub mod ray;
pub mod time;
pub mod transform;

pub use bounds::{BoundingVolume, HasBoundingVolume, RayHit};
pub use camera::Camera;
pub use color::Color;
pub use light::{
    light_radius, DirectionalLight, Light, LightKind, PointLight, SpotLight,
    ATTENUATION_CONSTANT,
};
pub use ndc::ScreenRect;
pub use ray::Ray;
pub use time::{Time, TimeClock};
pub use transform::Transform;

// glam is part of the public API (every type above speaks Vec3/Mat4/Quat).
pub use glam;
