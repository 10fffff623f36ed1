/// `#[repr(C)]` mirrors of the WGSL uniform blocks.
///
/// Every struct is a multiple of 16 bytes and uses `vec4` packing so the
/// Rust and WGSL layouts agree without explicit padding rules.
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use lucerna_core::{Color, DirectionalLight, PointLight, SpotLight};

/// Geometry stage, one per drawable (`gbuffer.wgsl`).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ObjectUniform {
    pub mvp: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// `transpose(inverse(model))`, so non-uniform scale keeps normals
    /// perpendicular to surfaces.
    pub normal_matrix: [[f32; 4]; 4],
}

impl ObjectUniform {
    pub fn new(view_proj: Mat4, model: Mat4) -> Self {
        Self {
            mvp: (view_proj * model).to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
        }
    }
}

/// Constants shared by every light drawn in a frame (`light_common.wgsl`).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LightBatch {
    /// `transpose(inverse(projection · view))`; the shaders multiply it with
    /// NDC as a row vector.
    pub screen_to_world: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    /// `(width, height, 1/width, 1/height)` in pixels.
    pub screen_size: [f32; 4],
}

impl LightBatch {
    pub fn new(view_proj: Mat4, eye: Vec3, width: u32, height: u32) -> Self {
        let (w, h) = (width.max(1) as f32, height.max(1) as f32);
        Self {
            screen_to_world: view_proj.inverse().transpose().to_cols_array_2d(),
            camera_position: eye.extend(1.0).to_array(),
            screen_size: [w, h, 1.0 / w, 1.0 / h],
        }
    }
}

/// Parameters of one light (`light_common.wgsl`, group 2).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuLight {
    /// xyz = world position, w = radius.
    pub position_radius: [f32; 4],
    /// xyz = direction the light travels, w = cosine of the cone half-angle.
    pub direction_cos: [f32; 4],
    /// rgb = colour, a = intensity.
    pub color_intensity: [f32; 4],
}

fn color_intensity(color: Color, intensity: f32) -> [f32; 4] {
    [color.r, color.g, color.b, intensity]
}

impl From<&PointLight> for GpuLight {
    fn from(l: &PointLight) -> Self {
        Self {
            position_radius: l.position().extend(l.radius()).to_array(),
            direction_cos: [0.0, -1.0, 0.0, -1.0],
            color_intensity: color_intensity(l.color(), l.intensity()),
        }
    }
}

impl From<&SpotLight> for GpuLight {
    fn from(l: &SpotLight) -> Self {
        Self {
            position_radius: l.position().extend(l.radius()).to_array(),
            direction_cos: l.direction().extend(l.angle().cos()).to_array(),
            color_intensity: color_intensity(l.color(), l.intensity()),
        }
    }
}

impl From<&DirectionalLight> for GpuLight {
    fn from(l: &DirectionalLight) -> Self {
        Self {
            position_radius: [0.0; 4],
            direction_cos: l.direction().extend(-1.0).to_array(),
            color_intensity: color_intensity(l.color(), l.intensity()),
        }
    }
}

/// Forward overlay, one per wireframe (`unlit.wgsl`).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WireUniform {
    pub mvp: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// Gradient skybox (`skybox.wgsl`).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SkyUniform {
    /// Inverse of `projection · rotation(view)`; maps clip positions to view
    /// directions.
    pub inv_view_proj: [[f32; 4]; 4],
    pub zenith: [f32; 4],
    pub horizon: [f32; 4],
    pub ground: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_sizes_match_wgsl() {
        use std::mem::size_of;
        assert_eq!(size_of::<ObjectUniform>(), 192);
        assert_eq!(size_of::<LightBatch>(), 96);
        assert_eq!(size_of::<GpuLight>(), 48);
        assert_eq!(size_of::<WireUniform>(), 80);
        assert_eq!(size_of::<SkyUniform>(), 112);
    }

    #[test]
    fn screen_to_world_round_trips_through_row_vector_product() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(45f32.to_radians(), 1.5, 0.1, 1000.0);
        let batch = LightBatch::new(proj * view, Vec3::ZERO, 300, 200);

        let world = Vec3::new(1.0, -2.0, 3.0);
        let clip = (proj * view) * world.extend(1.0);
        let ndc = clip / clip.w;

        // WGSL `v * M` equals `transpose(M) * v`
        let m = Mat4::from_cols_array_2d(&batch.screen_to_world);
        let back = m.transpose() * ndc;
        let back = back.truncate() / back.w;
        assert!(back.abs_diff_eq(world, 1e-3));
    }

    #[test]
    fn spot_packs_cone_cosine() {
        let spot = SpotLight::new(Vec3::ONE, Vec3::NEG_Y).with_angle(60f32.to_radians());
        let gpu = GpuLight::from(&spot);
        assert!((gpu.direction_cos[3] - 0.5).abs() < 1e-5);
        assert_eq!(gpu.position_radius[..3], [1.0, 1.0, 1.0]);
    }
}
