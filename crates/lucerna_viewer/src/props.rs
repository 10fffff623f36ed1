//! Selectable meshes with box colliders.

use lucerna_core::glam::{Quat, Vec2, Vec3};
use lucerna_core::{BoundingVolume, Camera, HasBoundingVolume, Transform};
use lucerna_renderer::{MaterialHandle, MeshDrawable, MeshHandle};

pub struct Prop {
    pub transform: Transform,
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
    pub collider: BoundingVolume,
    /// Radians per second around +Y.
    pub spin: f32,
}

impl Prop {
    /// `mesh_min..mesh_max` are the mesh's object-space bounds.
    pub fn new(
        transform: Transform,
        mesh: MeshHandle,
        material: MaterialHandle,
        mesh_min: Vec3,
        mesh_max: Vec3,
    ) -> Self {
        let mut collider = BoundingVolume::new();
        collider.cover_to_fit(mesh_min, mesh_max);
        collider.apply_transform(transform.position, transform.scale, transform.rotation);
        Self {
            transform,
            mesh,
            material,
            collider,
            spin: 0.0,
        }
    }

    pub fn with_spin(mut self, spin: f32) -> Self {
        self.spin = spin;
        self
    }

    pub fn update(&mut self, dt: f32) {
        if self.spin == 0.0 {
            return;
        }
        // spin turns the mesh only: a collider keeps just two diagonal
        // corners, so a yawed box would collapse towards zero thickness
        self.transform.rotate_axis(Vec3::Y, self.spin * dt);
    }

    pub fn drawable(&self) -> MeshDrawable {
        MeshDrawable::new(&self.transform, self.mesh, self.material)
    }

    pub fn move_by(&mut self, delta: Vec3) {
        self.transform.translate(delta);
        self.collider.append_translation(delta);
    }

    /// Rotates mesh and collider together; the collider box is rebuilt
    /// from its two rotated diagonal corners.
    pub fn rotate_to(&mut self, rotation: Quat) {
        self.transform.rotation = rotation;
        self.collider.apply_rotation(rotation);
    }
}

impl HasBoundingVolume for Prop {
    fn bounding_volume(&self) -> &BoundingVolume {
        &self.collider
    }
}

/// Index of the nearest collider hit by the ray through `ndc`.
pub fn pick<V: HasBoundingVolume>(camera: &Camera, ndc: Vec2, candidates: &[V]) -> Option<usize> {
    let ray = camera.screen_ray(ndc);
    candidates
        .iter()
        .enumerate()
        .filter_map(|(i, c)| {
            let hit = c.bounding_volume().intersects_ray(&ray);
            hit.is_hit().then(|| (i, hit.distance().unwrap_or(f32::INFINITY)))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_prop(position: Vec3) -> Prop {
        Prop::new(
            Transform::from_position(position),
            MeshHandle::default(),
            MaterialHandle::default(),
            Vec3::splat(-0.5),
            Vec3::splat(0.5),
        )
    }

    #[test]
    fn picks_nearest_of_stacked_boxes() {
        let camera = Camera::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let props = [unit_prop(Vec3::new(0.0, 0.0, -3.0)), unit_prop(Vec3::ZERO), unit_prop(Vec3::new(4.0, 0.0, 0.0))];
        assert_eq!(pick(&camera, Vec2::ZERO, &props), Some(1));
    }

    #[test]
    fn empty_space_picks_nothing() {
        let camera = Camera::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let props = [unit_prop(Vec3::ZERO)];
        assert_eq!(pick(&camera, Vec2::new(0.9, 0.9), &props), None);
    }

    #[test]
    fn spinning_keeps_the_collider_axis_aligned() {
        let mut prop = unit_prop(Vec3::ZERO).with_spin(1.0);
        let extent = prop.collider.extent();
        // eight steps add up to a 45 degree yaw
        for _ in 0..8 {
            prop.update(std::f32::consts::FRAC_PI_4 / 4.0);
        }
        assert!(prop.transform.rotation.angle_between(Quat::IDENTITY) > 0.7);
        assert!(prop.collider.extent().abs_diff_eq(extent, 1e-5));
    }

    #[test]
    fn collider_follows_moves() {
        let mut prop = unit_prop(Vec3::ZERO);
        prop.move_by(Vec3::new(2.0, 0.0, 0.0));
        assert!(prop.collider.center().abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-5));
        prop.rotate_to(Quat::from_rotation_y(0.3));
        assert_eq!(prop.collider.rotation(), Quat::from_rotation_y(0.3).normalize());
    }
}
