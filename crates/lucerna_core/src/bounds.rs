//! Axis-aligned bounding volume with a cached world matrix.
//!
//! A `BoundingVolume` is the box used both for entity colliders (picking,
//! debug wireframes) and for light volumes (visibility culling).  It stores
//! its transform as separate components and keeps a derived model matrix and
//! the two diagonal world corners in sync with them: every mutator ends by
//! recomputing, so readers never see stale data.
//!
//! ```text
//! model = T(offset_position + translation) · R(rotation) · S(scale * offset_scale)
//! ```
//!
//! The offset pair fits the unit box to a visual mesh (see
//! [`BoundingVolume::cover_to_fit`]) independently of the world transform.

use glam::{Mat4, Quat, Vec3};

use crate::ray::Ray;

/// Outcome of [`BoundingVolume::intersects_ray`].
///
/// A miss still carries the `t` the slab test computed (the far slab
/// distance, or the near one when the box lies past the ray's length) so
/// picking code can inspect how close the ray came.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RayHit {
    Hit { t: f32 },
    Miss { t: f32 },
}

impl RayHit {
    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, RayHit::Hit { .. })
    }

    /// Distance along the ray for a hit, `None` for a miss.
    pub fn distance(&self) -> Option<f32> {
        match *self {
            RayHit::Hit { t } => Some(t),
            RayHit::Miss { .. } => None,
        }
    }
}

/// Anything that owns a bounding volume (lights, collider entities).
pub trait HasBoundingVolume {
    fn bounding_volume(&self) -> &BoundingVolume;
}

impl HasBoundingVolume for BoundingVolume {
    fn bounding_volume(&self) -> &BoundingVolume {
        self
    }
}

impl<T: HasBoundingVolume + ?Sized> HasBoundingVolume for &T {
    fn bounding_volume(&self) -> &BoundingVolume {
        (**self).bounding_volume()
    }
}

/// Axis-aligned box in local space (unit cube centred on the origin) placed
/// in the world by a translation / rotation / scale plus a fitting offset.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingVolume {
    local_min: Vec3,
    local_max: Vec3,

    translation: Vec3,
    scale: Vec3,
    rotation: Quat,
    offset_position: Vec3,
    offset_scale: Vec3,

    // ── Derived ──
    model: Mat4,
    bottom_left: Vec3,
    top_right: Vec3,
}

impl Default for BoundingVolume {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundingVolume {
    /// Unit box (`±0.5`) at the origin.
    pub fn new() -> Self {
        let local_min = Vec3::splat(-0.5);
        let local_max = Vec3::splat(0.5);
        Self {
            local_min,
            local_max,
            translation: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation: Quat::IDENTITY,
            offset_position: Vec3::ZERO,
            offset_scale: Vec3::ONE,
            model: Mat4::IDENTITY,
            bottom_left: local_min,
            top_right: local_max,
        }
    }

    /// Unit box placed at `translation` and scaled by `scale`.
    pub fn from_translation_scale(translation: Vec3, scale: Vec3) -> Self {
        let mut v = Self::new();
        v.apply_transform(translation, scale, Quat::IDENTITY);
        v
    }

    // ── Mutators ────────────────────────────────────────────────────────────

    pub fn apply_transform(&mut self, translation: Vec3, scale: Vec3, rotation: Quat) {
        self.translation = translation;
        self.scale = scale;
        self.rotation = rotation;
        self.recompute_model();
    }

    pub fn apply_translation(&mut self, translation: Vec3) {
        self.translation = translation;
        self.recompute_model();
    }

    pub fn append_translation(&mut self, delta: Vec3) {
        self.translation += delta;
        self.recompute_model();
    }

    pub fn apply_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.recompute_model();
    }

    /// Multiplies the current scale componentwise.
    pub fn append_scale(&mut self, factor: Vec3) {
        self.scale *= factor;
        self.recompute_model();
    }

    pub fn apply_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation.normalize();
        self.recompute_model();
    }

    /// Composes `delta` on top of the current rotation (`delta * current`).
    pub fn append_rotation(&mut self, delta: Quat) {
        self.rotation = (delta * self.rotation).normalize();
        self.recompute_model();
    }

    pub fn set_offset_position(&mut self, offset: Vec3) {
        self.offset_position = offset;
        self.recompute_model();
    }

    pub fn set_offset_scale(&mut self, offset: Vec3) {
        self.offset_scale = offset;
        self.recompute_model();
    }

    /// Fit the box around a mesh whose local bounds are `mesh_min..mesh_max`.
    pub fn cover_to_fit(&mut self, mesh_min: Vec3, mesh_max: Vec3) {
        let size = mesh_max - mesh_min;
        self.offset_position = mesh_min + size * 0.5;
        self.offset_scale = size;
        self.recompute_model();
    }

    fn recompute_model(&mut self) {
        self.model = Mat4::from_translation(self.offset_position + self.translation)
            * Mat4::from_quat(self.rotation)
            * Mat4::from_scale(self.scale * self.offset_scale);

        self.bottom_left = self.model.project_point3(self.local_min);
        self.top_right = self.model.project_point3(self.local_max);
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    #[inline]
    pub fn model(&self) -> Mat4 {
        self.model
    }

    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    #[inline]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    #[inline]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// World image of the local minimum corner.
    #[inline]
    pub fn bottom_left(&self) -> Vec3 {
        self.bottom_left
    }

    /// World image of the local maximum corner.
    #[inline]
    pub fn top_right(&self) -> Vec3 {
        self.top_right
    }

    /// Componentwise minimum of the two diagonal corners.
    #[inline]
    pub fn min(&self) -> Vec3 {
        self.bottom_left.min(self.top_right)
    }

    /// Componentwise maximum of the two diagonal corners.
    #[inline]
    pub fn max(&self) -> Vec3 {
        self.bottom_left.max(self.top_right)
    }

    pub fn center(&self) -> Vec3 {
        (self.bottom_left + self.top_right) * 0.5
    }

    /// Full size along each axis (always non-negative).
    pub fn extent(&self) -> Vec3 {
        self.max() - self.min()
    }

    /// The eight world-space corners of the axis-aligned box spanned by the
    /// two diagonal corners.  Index bit 0 selects x, bit 1 y, bit 2 z
    /// (0 = min, 1 = max).
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min(), self.max());
        std::array::from_fn(|i| {
            Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            )
        })
    }

    /// `true` when `p` lies strictly inside the box on every axis.
    pub fn contains_point_strict(&self, p: Vec3) -> bool {
        let (lo, hi) = (self.min(), self.max());
        p.cmpgt(lo).all() && p.cmplt(hi).all()
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    /// Slab test against the world box.
    ///
    /// Zero direction components produce infinite reciprocals, which the
    /// min/max reductions handle without special cases.
    pub fn intersects_ray(&self, ray: &Ray) -> RayHit {
        let inv = ray.direction.recip();
        let t1 = (self.bottom_left - ray.origin) * inv;
        let t2 = (self.top_right - ray.origin) * inv;

        let near = t1.min(t2);
        let far = t1.max(t2);
        let tmin = nan_safe_max(nan_safe_max(near.x, near.y), near.z);
        let tmax = nan_safe_min(nan_safe_min(far.x, far.y), far.z);

        // whole box behind the origin
        if tmax < 0.0 {
            return RayHit::Miss { t: tmax };
        }
        if tmin > tmax {
            return RayHit::Miss { t: tmax };
        }
        if tmin > ray.length {
            return RayHit::Miss { t: tmin };
        }
        RayHit::Hit { t: tmin }
    }
}

// 0 * inf yields NaN when the origin sits exactly on a slab plane of a
// parallel axis; treat NaN as "no constraint" from that axis.
#[inline]
fn nan_safe_max(a: f32, b: f32) -> f32 {
    if a.is_nan() {
        b
    } else if b.is_nan() {
        a
    } else {
        a.max(b)
    }
}

#[inline]
fn nan_safe_min(a: f32, b: f32) -> f32 {
    if a.is_nan() {
        b
    } else if b.is_nan() {
        a
    } else {
        a.min(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert!(a.abs_diff_eq(b, 1e-5), "{a:?} != {b:?}");
    }

    #[test]
    fn default_is_unit_box() {
        let v = BoundingVolume::new();
        assert_vec_eq(v.bottom_left(), Vec3::splat(-0.5));
        assert_vec_eq(v.top_right(), Vec3::splat(0.5));
        assert_eq!(v.model(), Mat4::IDENTITY);
    }

    #[test]
    fn ray_hits_front_face() {
        let v = BoundingVolume::new();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 100.0);
        match v.intersects_ray(&ray) {
            RayHit::Hit { t } => assert!((t - 4.5).abs() < 1e-5),
            miss => panic!("expected hit, got {miss:?}"),
        }
    }

    #[test]
    fn ray_pointing_away_misses() {
        let v = BoundingVolume::new();
        let ray = Ray::new(Vec3::new(10.0, 10.0, 10.0), Vec3::X, 100.0);
        assert!(!v.intersects_ray(&ray).is_hit());
    }

    #[test]
    fn ray_with_zero_components_is_tolerated() {
        let v = BoundingVolume::new();
        // parallel to x and y slabs, inside them
        let ray = Ray::new(Vec3::new(0.1, -0.2, -3.0), Vec3::Z, 10.0);
        assert_eq!(v.intersects_ray(&ray).distance(), Some(2.5));

        // parallel to x, outside the x slab
        let ray = Ray::new(Vec3::new(2.0, 0.0, -3.0), Vec3::Z, 10.0);
        assert!(!v.intersects_ray(&ray).is_hit());
    }

    #[test]
    fn ray_shorter_than_distance_misses() {
        let v = BoundingVolume::new();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, 2.0);
        assert_eq!(v.intersects_ray(&ray), RayHit::Miss { t: 4.5 });
    }

    #[test]
    fn box_behind_origin_reports_negative_far_distance() {
        let v = BoundingVolume::new();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, 100.0);
        match v.intersects_ray(&ray) {
            RayHit::Miss { t } => assert!(t < 0.0),
            hit => panic!("expected miss, got {hit:?}"),
        }
    }

    #[test]
    fn matrix_and_corners_stay_consistent() {
        let mut v = BoundingVolume::new();
        v.apply_transform(Vec3::new(1.0, 2.0, 3.0), Vec3::splat(2.0), Quat::IDENTITY);
        v.set_offset_position(Vec3::new(0.5, 0.0, 0.0));
        v.append_translation(Vec3::Y);
        v.append_scale(Vec3::new(1.0, 0.5, 1.0));

        let expected = Mat4::from_translation(Vec3::new(1.5, 3.0, 3.0))
            * Mat4::from_scale(Vec3::new(2.0, 1.0, 2.0));
        assert!(v.model().abs_diff_eq(expected, 1e-5));
        assert_vec_eq(v.bottom_left(), expected.transform_point3(Vec3::splat(-0.5)));
        assert_vec_eq(v.top_right(), expected.transform_point3(Vec3::splat(0.5)));
    }

    #[test]
    fn rotation_is_applied_between_translation_and_scale() {
        let mut v = BoundingVolume::new();
        v.apply_scale(Vec3::new(4.0, 1.0, 1.0));
        v.apply_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
        // the long x axis now points along y
        let ext = v.extent();
        assert!((ext.y - 4.0).abs() < 1e-4);
        assert!((ext.x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn cover_to_fit_matches_mesh_bounds() {
        let mut v = BoundingVolume::new();
        v.cover_to_fit(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 4.0, 6.0));
        assert_vec_eq(v.bottom_left(), Vec3::ZERO);
        assert_vec_eq(v.top_right(), Vec3::new(2.0, 4.0, 6.0));

        v.apply_translation(Vec3::X);
        assert_vec_eq(v.bottom_left(), Vec3::X);
    }

    #[test]
    fn degenerate_box_is_not_an_error() {
        let v = BoundingVolume::from_translation_scale(Vec3::ZERO, Vec3::ZERO);
        assert_eq!(v.extent(), Vec3::ZERO);
        assert!(!v.contains_point_strict(Vec3::ZERO));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, 10.0);
        assert_eq!(v.intersects_ray(&ray).distance(), Some(5.0));
    }

    #[test]
    fn corners_cover_all_combinations() {
        let v = BoundingVolume::from_translation_scale(Vec3::ZERO, Vec3::splat(2.0));
        let c = v.corners();
        assert_vec_eq(c[0], Vec3::splat(-1.0));
        assert_vec_eq(c[7], Vec3::splat(1.0));
        assert_vec_eq(c[1], Vec3::new(1.0, -1.0, -1.0));
        assert_vec_eq(c[6], Vec3::new(-1.0, 1.0, 1.0));
    }

    #[test]
    fn strict_containment_excludes_faces() {
        let v = BoundingVolume::new();
        assert!(v.contains_point_strict(Vec3::ZERO));
        assert!(!v.contains_point_strict(Vec3::new(0.5, 0.0, 0.0)));
    }
}
