//! Orbit camera driven by [`InputState`].

use lucerna_core::glam::{EulerRot, Mat3, Vec3};
use lucerna_core::Camera;
use lucerna_renderer::RendererConfig;

use crate::input::{InputState, KeyCode, MouseButton};

/// Camera built from the renderer's projection settings.
pub fn configured_camera(config: &RendererConfig, eye: Vec3, target: Vec3, width: u32, height: u32) -> Camera {
    let mut camera = Camera {
        fovy: config.fov_y_degrees.to_radians(),
        znear: config.z_near,
        zfar: config.z_far,
        ..Camera::looking_at(eye, target)
    };
    camera.set_aspect(width, height);
    camera
}

/// WASD translation, right-drag orbit around the target, wheel zoom.
#[derive(Debug, Clone)]
pub struct OrbitController {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    /// Translation units per second.
    pub speed: f32,
    /// Radians per pixel of drag.
    pub mouse_sensitivity: f32,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 10.0,
            speed: 10.0,
            mouse_sensitivity: 0.005,
        }
    }
}

impl OrbitController {
    /// Angles and distance matching `camera`'s current placement.
    pub fn from_camera(camera: &Camera) -> Self {
        let offset = camera.eye - camera.target;
        let distance = offset.length().max(1e-3);
        let dir = offset / distance;
        Self {
            yaw: dir.x.atan2(dir.z),
            pitch: (-dir.y).asin(),
            distance,
            ..Self::default()
        }
    }

    /// Applies one frame of input to `camera`.  `dt` is in seconds.
    pub fn update(&mut self, camera: &mut Camera, input: &mut InputState, dt: f32) {
        // ── WASD translation ──────────────────────────────────────────────
        let mut axis = Vec3::ZERO;
        for (key, dir) in [
            (KeyCode::KeyW, Vec3::Z),
            (KeyCode::KeyS, Vec3::NEG_Z),
            (KeyCode::KeyD, Vec3::X),
            (KeyCode::KeyA, Vec3::NEG_X),
        ] {
            if input.key_held(key) {
                axis += dir;
            }
        }
        if axis.length_squared() > 1e-6 {
            let forward = camera.forward();
            let right = forward.cross(camera.up).normalize();
            let disp = (forward * axis.z + right * axis.x).normalize() * self.speed * dt;
            camera.eye += disp;
            camera.target += disp;
        }

        // ── Right-drag orbit and wheel zoom ───────────────────────────────
        let (dx, dy) = input.consume_mouse_delta();
        let scroll = input.consume_scroll();
        let dragging = input.is_button_down(MouseButton::Right);
        if !dragging && scroll == 0.0 {
            return;
        }
        if dragging {
            self.yaw -= dx * self.mouse_sensitivity;
            self.pitch -= dy * self.mouse_sensitivity;
            const LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;
            self.pitch = self.pitch.clamp(-LIMIT, LIMIT);
        }
        self.distance = (self.distance * 0.9f32.powf(scroll)).clamp(0.5, camera.zfar * 0.5);

        let rot = Mat3::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0);
        camera.eye = camera.target + rot * Vec3::new(0.0, 0.0, self.distance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_camera_reproduces_eye() {
        let camera = Camera::looking_at(Vec3::new(3.0, 4.0, 5.0), Vec3::new(0.0, 1.0, 0.0));
        let mut orbit = OrbitController::from_camera(&camera);
        let mut moved = camera.clone();
        let mut input = InputState::new();
        // a drag without movement rebuilds the eye from the stored angles
        input.update_mouse_button(MouseButton::Right, true);
        orbit.update(&mut moved, &mut input, 0.016);
        assert!(moved.eye.abs_diff_eq(camera.eye, 1e-4), "{:?}", moved.eye);
    }

    #[test]
    fn wasd_moves_eye_and_target_together() {
        let mut camera = Camera::default();
        let mut orbit = OrbitController::from_camera(&camera);
        let mut input = InputState::new();
        input.update_key(KeyCode::KeyW, true);
        orbit.update(&mut camera, &mut input, 0.5);
        assert!(camera.eye.abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), 1e-4));
        assert!(camera.target.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-4));
    }

    #[test]
    fn configured_camera_uses_renderer_settings() {
        let cfg = RendererConfig {
            fov_y_degrees: 60.0,
            z_far: 250.0,
            ..RendererConfig::default()
        };
        let cam = configured_camera(&cfg, Vec3::Z, Vec3::ZERO, 200, 100);
        assert!((cam.fovy - 60f32.to_radians()).abs() < 1e-6);
        assert_eq!(cam.zfar, 250.0);
        assert_eq!(cam.aspect, 2.0);
    }
}
