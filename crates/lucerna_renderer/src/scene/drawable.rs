/// What the scene hands the renderer each frame.
use glam::Mat4;
use lucerna_core::{DirectionalLight, PointLight, SpotLight, Transform};

use crate::resources::{MaterialHandle, MeshHandle};

/// One mesh instance drawn by the geometry stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshDrawable {
    pub model: Mat4,
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
}

impl MeshDrawable {
    pub fn new(transform: &Transform, mesh: MeshHandle, material: MaterialHandle) -> Self {
        Self {
            model: transform.matrix(),
            mesh,
            material,
        }
    }
}

/// Collector passed to [`TerrainSource::render`].
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<MeshDrawable>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, drawable: MeshDrawable) {
        self.items.push(drawable);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[MeshDrawable] {
        &self.items
    }
}

impl Extend<MeshDrawable> for DrawList {
    fn extend<I: IntoIterator<Item = MeshDrawable>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

/// Terrain contributes geometry through the same drawable contract as any
/// mesh; it may choose chunks or levels of detail from the matrices.
pub trait TerrainSource {
    fn render(&self, projection: Mat4, view: Mat4, out: &mut DrawList);
}

/// Background drawn by the forward stage wherever no geometry was written.
///
/// `prepare` runs before any render pass is open (uploads go here);
/// `render` records into the forward stage's pass, whose depth attachment
/// is the G-buffer depth.
pub trait Backdrop {
    fn prepare(&mut self, queue: &wgpu::Queue, projection: Mat4, view: Mat4);
    fn render(&self, rpass: &mut wgpu::RenderPass<'_>);
}

/// Per-frame scene input for [`crate::Renderer::render_frame`].
///
/// The light slices are borrowed mutably because culling reorders them in
/// place; the scene keeps ownership.
pub struct SceneContents<'a> {
    pub drawables: &'a [MeshDrawable],
    pub terrain: Option<&'a dyn TerrainSource>,
    pub point_lights: &'a mut [PointLight],
    pub spot_lights: &'a mut [SpotLight],
    pub directional_lights: &'a [DirectionalLight],
}
