//! Tiled ground plane streamed around the camera.

use lucerna_core::glam::{Mat4, Vec3};
use lucerna_renderer::{DrawList, MaterialHandle, MeshDrawable, MeshHandle, TerrainSource};

/// Repeats one flat chunk mesh on a grid centred under the eye.
pub struct GridTerrain {
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
    /// Edge length of one chunk; must match the chunk mesh.
    pub chunk_size: f32,
    /// Chunks drawn in each direction from the eye's chunk.
    pub radius: i32,
    pub height: f32,
}

impl GridTerrain {
    fn chunk_origins(&self, eye: Vec3) -> impl Iterator<Item = Vec3> + '_ {
        let cx = (eye.x / self.chunk_size).round() as i32;
        let cz = (eye.z / self.chunk_size).round() as i32;
        let r = self.radius;
        (-r..=r).flat_map(move |dz| {
            (-r..=r).map(move |dx| {
                Vec3::new(
                    (cx + dx) as f32 * self.chunk_size,
                    self.height,
                    (cz + dz) as f32 * self.chunk_size,
                )
            })
        })
    }
}

impl TerrainSource for GridTerrain {
    fn render(&self, _projection: Mat4, view: Mat4, out: &mut DrawList) {
        let eye = view.inverse().w_axis.truncate();
        out.extend(self.chunk_origins(eye).map(|origin| MeshDrawable {
            model: Mat4::from_translation(origin),
            mesh: self.mesh,
            material: self.material,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_follows_the_eye() {
        let terrain = GridTerrain {
            mesh: MeshHandle::default(),
            material: MaterialHandle::default(),
            chunk_size: 20.0,
            radius: 1,
            height: 0.0,
        };
        let view = Mat4::look_at_rh(Vec3::new(41.0, 5.0, -19.0), Vec3::new(41.0, 0.0, -30.0), Vec3::Y);
        let mut list = DrawList::new();
        terrain.render(Mat4::IDENTITY, view, &mut list);
        assert_eq!(list.len(), 9);
        let centre = list.as_slice()[4].model.w_axis.truncate();
        assert_eq!(centre, Vec3::new(40.0, 0.0, -20.0));
    }
}
