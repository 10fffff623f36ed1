/// Data bundle assembled once per frame and passed immutably to every
/// [`RenderStage`](crate::graph::RenderStage).
///
/// The packet is pure CPU data with handles already resolved: stages never
/// see the registry, the scene lists or the culling, only what they draw.
use std::sync::Arc;

use glam::{Mat4, Vec3};
use lucerna_core::{Color, LightKind, ScreenRect};

use crate::geometry::Mesh;
use crate::pipeline::uniforms::GpuLight;

// ── Camera ────────────────────────────────────────────────────────────────────

/// Snapshot of camera state for a single frame.
#[derive(Debug, Clone, Copy)]
pub struct CameraPacket {
    pub view: Mat4,
    pub projection: Mat4,
    pub view_proj: Mat4,
    pub eye: Vec3,
}

impl CameraPacket {
    pub fn new(view: Mat4, projection: Mat4, eye: Vec3) -> Self {
        Self {
            view,
            projection,
            view_proj: projection * view,
            eye,
        }
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// One mesh draw, fully resolved to GPU objects.
pub struct GeometryDraw {
    pub mesh: Mesh,
    /// Material bind group (group 1).
    pub material: Arc<wgpu::BindGroup>,
    pub model: Mat4,
}

// ── Lights ────────────────────────────────────────────────────────────────────

/// One visible light.
#[derive(Debug, Clone, Copy)]
pub struct LightDraw {
    pub kind: LightKind,
    pub params: GpuLight,
    /// NDC rectangle the quad is shrunk to; full screen for directional
    /// lights and for volumes the eye is inside.
    pub rect: ScreenRect,
}

// ── Overlay ───────────────────────────────────────────────────────────────────

/// A queued debug wireframe (unit cube transformed by `mvp`).
#[derive(Debug, Clone, Copy)]
pub struct WireDraw {
    pub mvp: Mat4,
    pub color: Color,
}

// ── Viewport ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

// ── Frame packet ──────────────────────────────────────────────────────────────

pub struct FramePacket {
    pub viewport: Viewport,
    pub camera: CameraPacket,
    pub geometry: Vec<GeometryDraw>,
    /// Visible lights in draw order: points, then spots, then directionals.
    pub lights: Vec<LightDraw>,
    pub wires: Vec<WireDraw>,
    pub show_gbuffer: bool,
    pub clear_color: wgpu::Color,
}
