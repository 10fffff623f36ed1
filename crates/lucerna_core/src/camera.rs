use glam::{Mat4, Vec2, Vec3};

use crate::ray::Ray;

/// Perspective camera used by the renderer and by picking code.
///
/// Matrices follow the wgpu convention: right-handed view space, clip depth
/// in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    // --- view parameters --------------------------------------------------
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    // --- projection parameters --------------------------------------------
    /// Vertical field of view in radians.
    pub fovy: f32,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fovy: 45.0f32.to_radians(),
            aspect: 1.0,
            znear: 0.1,
            zfar: 1000.0,
        }
    }
}

impl Camera {
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        Self { eye, target, ..Self::default() }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.eye
    }

    /// Unit vector from the eye towards the target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or(Vec3::NEG_Z)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Update aspect ratio when viewport dimensions change.  Zero-height
    /// viewports (minimised windows) keep the previous value.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// World-space ray through an NDC point, starting on the near plane and
    /// spanning the frustum depth.
    pub fn screen_ray(&self, ndc: Vec2) -> Ray {
        let inv = self.view_projection().inverse();
        let near = inv.project_point3(ndc.extend(0.0));
        let far = inv.project_point3(ndc.extend(1.0));
        let span = far - near;
        let length = span.length();
        Ray::new(near, span.normalize_or(self.forward()), length)
    }

    /// Convert a pixel position (origin top-left) to NDC.
    pub fn pixel_to_ndc(pixel: Vec2, width: u32, height: u32) -> Vec2 {
        let w = width.max(1) as f32;
        let h = height.max(1) as f32;
        Vec2::new(pixel.x / w * 2.0 - 1.0, 1.0 - pixel.y / h * 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_ray_points_at_target() {
        let cam = Camera::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let ray = cam.screen_ray(Vec2::ZERO);
        assert!(ray.direction.abs_diff_eq(Vec3::NEG_Z, 1e-4));
        assert!((ray.origin.z - (10.0 - cam.znear)).abs() < 1e-3);
        assert!(ray.length > 900.0);
    }

    #[test]
    fn pixel_corners_map_to_ndc_corners() {
        let tl = Camera::pixel_to_ndc(Vec2::ZERO, 800, 600);
        assert_eq!(tl, Vec2::new(-1.0, 1.0));
        let br = Camera::pixel_to_ndc(Vec2::new(800.0, 600.0), 800, 600);
        assert_eq!(br, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn minimised_viewport_keeps_aspect() {
        let mut cam = Camera::default();
        cam.set_aspect(1600, 900);
        let aspect = cam.aspect;
        cam.set_aspect(1600, 0);
        assert_eq!(cam.aspect, aspect);
    }
}
