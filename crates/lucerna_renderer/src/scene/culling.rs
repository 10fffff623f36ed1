/// Light-volume visibility culling.
///
/// Every point and spot light owns a box ([`BoundingVolume`]) outside of
/// which its contribution is zero.  Each frame the light lists are
/// partitioned in place so that the lights whose box can touch the view
/// come first; the accumulation stage only draws that prefix, and for each
/// drawn light it shrinks the screen quad to the box's projected
/// [`Footprint`].
///
/// ## Projection
///
/// The eight corners are transformed to clip space.  Corners behind the eye
/// have `w ≤ 0` and would flip sign under the perspective divide, so the
/// box edges are first clipped against the plane `w = ε`: the footprint is
/// built from the corners in front of that plane plus the points where
/// edges cross it.  A box entirely behind the eye has no footprint.
use glam::{Mat4, Vec2, Vec3, Vec4};
use lucerna_core::{BoundingVolume, HasBoundingVolume, ScreenRect};

/// Clip-space `w` below which a point counts as behind the eye.
const W_EPSILON: f32 = 1e-5;

/// Corner index pairs forming the 12 box edges (bit 0 = x, 1 = y, 2 = z).
#[rustfmt::skip]
const EDGES: [(usize, usize); 12] = [
    (0, 1), (2, 3), (4, 5), (6, 7),
    (0, 2), (1, 3), (4, 6), (5, 7),
    (0, 4), (1, 5), (2, 6), (3, 7),
];

/// Screen coverage of one light volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Footprint {
    /// The eye is inside the volume: the light may touch every pixel.
    Immersed,
    /// The volume cannot touch the viewport.
    Outside,
    /// Unclamped NDC rectangle covered by the projected volume.
    Rect(ScreenRect),
}

impl Footprint {
    #[inline]
    pub fn is_visible(&self) -> bool {
        !matches!(self, Footprint::Outside)
    }

    /// Rectangle to draw the light quad over, clamped to the viewport.
    pub fn quad_rect(&self) -> ScreenRect {
        match self {
            Footprint::Immersed | Footprint::Outside => ScreenRect::FULLSCREEN,
            Footprint::Rect(rect) => rect.clamp_to_ndc(),
        }
    }
}

/// Per-frame visibility counts, logged at `trace`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CullStats {
    pub point_visible: usize,
    pub point_total: usize,
    pub spot_visible: usize,
    pub spot_total: usize,
}

/// Classify `volume` as seen from `eye` through `view_proj`.
pub fn footprint(eye: Vec3, view_proj: Mat4, volume: &BoundingVolume) -> Footprint {
    if volume.contains_point_strict(eye) {
        return Footprint::Immersed;
    }

    let clip: [Vec4; 8] = volume.corners().map(|c| view_proj * c.extend(1.0));

    let mut points: Vec<Vec2> = Vec::with_capacity(8 + EDGES.len());
    points.extend(clip.iter().filter(|c| c.w > W_EPSILON).map(|c| c.truncate().truncate() / c.w));

    for &(a, b) in &EDGES {
        let (ca, cb) = (clip[a], clip[b]);
        if (ca.w > W_EPSILON) != (cb.w > W_EPSILON) {
            let t = (W_EPSILON - ca.w) / (cb.w - ca.w);
            let p = ca.lerp(cb, t);
            points.push(Vec2::new(p.x, p.y) / W_EPSILON);
        }
    }

    match ScreenRect::from_points(points) {
        Some(rect) if !rect.is_outside_ndc() => Footprint::Rect(rect),
        _ => Footprint::Outside,
    }
}

/// Reorder `lights` so the visible ones occupy `[0, n)`, returning `n`.
///
/// Two-pointer partition: a visible light advances the front index, a
/// culled one is swapped with the last untested slot.  Each light is
/// tested once; order within either partition is not preserved.
pub fn cull<L: HasBoundingVolume>(eye: Vec3, view: Mat4, projection: Mat4, lights: &mut [L]) -> usize {
    let view_proj = projection * view;
    let mut front = 0;
    let mut back = lights.len();
    while front < back {
        if footprint(eye, view_proj, lights[front].bounding_volume()).is_visible() {
            front += 1;
        } else {
            back -= 1;
            lights.swap(front, back);
        }
    }
    front
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucerna_core::{Camera, PointLight};

    fn camera() -> Camera {
        Camera::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO)
    }

    fn cull_with(cam: &Camera, lights: &mut [PointLight]) -> usize {
        cull(cam.position(), cam.view(), cam.projection(), lights)
    }

    #[test]
    fn only_the_light_in_front_survives() {
        for aspect in [1.0, 16.0 / 9.0] {
            let mut cam = camera();
            cam.aspect = aspect;
            let mut lights = vec![
                PointLight::new(Vec3::ZERO),
                PointLight::new(Vec3::new(100.0, 0.0, 0.0)),
                PointLight::new(Vec3::new(-100.0, 0.0, 0.0)),
            ];
            let visible = cull_with(&cam, &mut lights);
            assert_eq!(visible, 1, "aspect {aspect}");
            assert_eq!(lights[0].position(), Vec3::ZERO);
        }
    }

    #[test]
    fn camera_inside_volume_is_visible_even_looking_away() {
        let cam = Camera::looking_at(Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 50.0));
        let light = PointLight::new(Vec3::ZERO);
        let vp = cam.view_projection();
        assert_eq!(footprint(cam.position(), vp, light.bounding_volume()), Footprint::Immersed);
    }

    #[test]
    fn volume_behind_camera_is_culled() {
        let cam = camera();
        let mut lights = vec![PointLight::new(Vec3::new(0.0, 0.0, 60.0))];
        assert_eq!(cull_with(&cam, &mut lights), 0);
    }

    #[test]
    fn volume_straddling_the_eye_plane_stays_visible() {
        // box spans z 10 ± 15.8 but sits to the side of the eye, overlapping
        // the left frustum edge
        let cam = camera();
        let light = PointLight::new(Vec3::new(-17.0, 0.0, 10.0));
        let fp = footprint(cam.position(), cam.view_projection(), light.bounding_volume());
        assert!(fp.is_visible(), "{fp:?}");
    }

    #[test]
    fn light_on_frustum_boundary_is_visible() {
        let cam = camera();
        // half-extent ≈ 15.8; the box's left face sits inside the right
        // frustum plane while its centre is well outside
        let half_width = (22.5f32).to_radians().tan() * 10.0;
        let light = PointLight::new(Vec3::new(half_width + 15.0, 0.0, 0.0));
        let fp = footprint(cam.position(), cam.view_projection(), light.bounding_volume());
        match fp {
            Footprint::Rect(rect) => assert!(rect.min.x <= 1.0),
            other => panic!("expected a rect, got {other:?}"),
        }
    }

    #[test]
    fn footprint_contains_projected_centre() {
        let cam = camera();
        let light = PointLight::new(Vec3::new(2.0, 1.0, -30.0)).with_intensity(1.0);
        let vp = cam.view_projection();
        let Footprint::Rect(rect) = footprint(cam.position(), vp, light.bounding_volume()) else {
            panic!("expected rect");
        };
        let c = vp.project_point3(light.position());
        assert!(rect.min.x < c.x && c.x < rect.max.x);
        assert!(rect.min.y < c.y && c.y < rect.max.y);
        let q = Footprint::Rect(rect).quad_rect();
        assert!(q.min.x >= -1.0 && q.max.x <= 1.0);
    }

    #[test]
    fn empty_list_is_fine() {
        let mut lights: Vec<PointLight> = Vec::new();
        assert_eq!(cull_with(&camera(), &mut lights), 0);
    }

    fn permutations(n: usize) -> Vec<Vec<usize>> {
        if n == 0 {
            return vec![Vec::new()];
        }
        let mut out = Vec::new();
        for p in permutations(n - 1) {
            for i in 0..=p.len() {
                let mut q = p.clone();
                q.insert(i, n - 1);
                out.push(q);
            }
        }
        out
    }

    #[test]
    fn visible_set_is_independent_of_input_order() {
        let cam = camera();
        let positions = [
            Vec3::ZERO,
            Vec3::new(100.0, 0.0, 0.0),
            Vec3::new(0.0, 3.0, -40.0),
            Vec3::new(0.0, 0.0, 80.0),
            Vec3::new(-100.0, 5.0, 0.0),
            Vec3::new(8.0, -4.0, -20.0),
        ];
        let vp = cam.view_projection();
        let expected: Vec<Vec3> = positions
            .iter()
            .copied()
            .filter(|&p| footprint(cam.position(), vp, PointLight::new(p).bounding_volume()).is_visible())
            .collect();

        for perm in permutations(positions.len()) {
            let mut lights: Vec<PointLight> = perm.iter().map(|&i| PointLight::new(positions[i])).collect();
            let visible = cull_with(&cam, &mut lights);
            assert_eq!(visible, expected.len());

            for (i, light) in lights.iter().enumerate() {
                let is_visible = expected.contains(&light.position());
                assert_eq!(is_visible, i < visible, "perm {perm:?}");
            }
        }
    }
}
