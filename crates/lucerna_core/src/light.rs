//! Dynamic light sources.
//!
//! Point and spot lights own a [`BoundingVolume`] sized from their intensity
//! so the renderer can cull them against the view.  Fields are private; every
//! setter that changes position or intensity rebuilds the volume, so a light
//! handed to the culler is always up to date.
//!
//! Directional lights have no volume and are always drawn full screen.

use glam::{Quat, Vec3};

use crate::bounds::{BoundingVolume, HasBoundingVolume};
use crate::color::Color;

/// Sizes light volumes only: a light's box has side
/// `sqrt(intensity / ATTENUATION_CONSTANT)`.  The shaders do not read it;
/// their falloff is windowed to zero at the box half-extent (`radius / 2`).
pub const ATTENUATION_CONSTANT: f32 = 0.01;

/// Side length of the volume of a light of `intensity`.
#[inline]
pub fn light_radius(intensity: f32) -> f32 {
    (intensity.max(0.0) / ATTENUATION_CONSTANT).sqrt()
}

/// Local axis a rotation is applied to when deriving a light direction.
const LOCAL_DOWN: Vec3 = Vec3::NEG_Y;

fn direction_from_rotation(rotation: Quat) -> Vec3 {
    (rotation * LOCAL_DOWN).normalize_or(LOCAL_DOWN)
}

/// Cube of side `radius` centred on `position`.
fn volume_for(position: Vec3, intensity: f32) -> BoundingVolume {
    let radius = light_radius(intensity);
    BoundingVolume::from_translation_scale(position, Vec3::splat(radius))
}

// ─── Point ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    position: Vec3,
    intensity: f32,
    color: Color,
    volume: BoundingVolume,
}

impl Default for PointLight {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl PointLight {
    pub const DEFAULT_INTENSITY: f32 = 10.0;

    /// White light of default intensity at `position`.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            intensity: Self::DEFAULT_INTENSITY,
            color: Color::WHITE,
            volume: volume_for(position, Self::DEFAULT_INTENSITY),
        }
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.set_intensity(intensity);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn radius(&self) -> f32 {
        light_radius(self.intensity)
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.refresh_volume();
    }

    /// Negative values are clamped to zero.
    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity.max(0.0);
        self.refresh_volume();
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Follow an owning entity's transform.  Rotation is irrelevant for an
    /// omnidirectional light.
    pub fn apply_transform(&mut self, translation: Vec3, _rotation: Quat) {
        self.set_position(translation);
    }

    fn refresh_volume(&mut self) {
        self.volume = volume_for(self.position, self.intensity);
    }
}

impl HasBoundingVolume for PointLight {
    fn bounding_volume(&self) -> &BoundingVolume {
        &self.volume
    }
}

// ─── Spot ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct SpotLight {
    position: Vec3,
    direction: Vec3,
    /// Cone half-angle in radians.
    angle: f32,
    intensity: f32,
    color: Color,
    volume: BoundingVolume,
}

impl Default for SpotLight {
    fn default() -> Self {
        Self::new(Vec3::ZERO, LOCAL_DOWN)
    }
}

impl SpotLight {
    pub const DEFAULT_INTENSITY: f32 = 10.0;
    pub const DEFAULT_ANGLE: f32 = std::f32::consts::PI / 6.0;

    pub fn new(position: Vec3, direction: Vec3) -> Self {
        Self {
            position,
            direction: direction.normalize_or(LOCAL_DOWN),
            angle: Self::DEFAULT_ANGLE,
            intensity: Self::DEFAULT_INTENSITY,
            color: Color::WHITE,
            volume: volume_for(position, Self::DEFAULT_INTENSITY),
        }
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.set_intensity(intensity);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.set_angle(angle);
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn radius(&self) -> f32 {
        light_radius(self.intensity)
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.refresh_volume();
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        self.direction = direction.normalize_or(LOCAL_DOWN);
    }

    /// Clamped to `[0, π]`.
    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle.clamp(0.0, std::f32::consts::PI);
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity.max(0.0);
        self.refresh_volume();
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Position follows `translation`; the cone points along the rotated
    /// local down axis.
    pub fn apply_transform(&mut self, translation: Vec3, rotation: Quat) {
        self.direction = direction_from_rotation(rotation);
        self.set_position(translation);
    }

    fn refresh_volume(&mut self) {
        self.volume = volume_for(self.position, self.intensity);
    }
}

impl HasBoundingVolume for SpotLight {
    fn bounding_volume(&self) -> &BoundingVolume {
        &self.volume
    }
}

// ─── Directional ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    direction: Vec3,
    intensity: f32,
    color: Color,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(LOCAL_DOWN)
    }
}

impl DirectionalLight {
    pub const DEFAULT_INTENSITY: f32 = 0.2;

    pub fn new(direction: Vec3) -> Self {
        Self {
            direction: direction.normalize_or(LOCAL_DOWN),
            intensity: Self::DEFAULT_INTENSITY,
            color: Color::WHITE,
        }
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.set_intensity(intensity);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        self.direction = direction.normalize_or(LOCAL_DOWN);
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity.max(0.0);
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn apply_transform(&mut self, _translation: Vec3, rotation: Quat) {
        self.direction = direction_from_rotation(rotation);
    }
}

// ─── Closed set ────────────────────────────────────────────────────────────

/// Light type tag.  `ORDER` is the order the accumulation stage draws in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightKind {
    Point,
    Spot,
    Directional,
}

impl LightKind {
    pub const ORDER: [LightKind; 3] = [LightKind::Point, LightKind::Spot, LightKind::Directional];

    pub fn label(self) -> &'static str {
        match self {
            LightKind::Point => "point",
            LightKind::Spot => "spot",
            LightKind::Directional => "directional",
        }
    }
}

/// Any light, for code that handles all kinds uniformly (editors, loaders).
#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    Point(PointLight),
    Spot(SpotLight),
    Directional(DirectionalLight),
}

impl Light {
    pub fn kind(&self) -> LightKind {
        match self {
            Light::Point(_) => LightKind::Point,
            Light::Spot(_) => LightKind::Spot,
            Light::Directional(_) => LightKind::Directional,
        }
    }

    pub fn intensity(&self) -> f32 {
        match self {
            Light::Point(l) => l.intensity(),
            Light::Spot(l) => l.intensity(),
            Light::Directional(l) => l.intensity(),
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Light::Point(l) => l.color(),
            Light::Spot(l) => l.color(),
            Light::Directional(l) => l.color(),
        }
    }

    /// Volume used for culling; `None` for directional lights.
    pub fn bounding_volume(&self) -> Option<&BoundingVolume> {
        match self {
            Light::Point(l) => Some(l.bounding_volume()),
            Light::Spot(l) => Some(l.bounding_volume()),
            Light::Directional(_) => None,
        }
    }

    pub fn apply_transform(&mut self, translation: Vec3, rotation: Quat) {
        match self {
            Light::Point(l) => l.apply_transform(translation, rotation),
            Light::Spot(l) => l.apply_transform(translation, rotation),
            Light::Directional(l) => l.apply_transform(translation, rotation),
        }
    }
}

impl From<PointLight> for Light {
    fn from(l: PointLight) -> Self {
        Light::Point(l)
    }
}

impl From<SpotLight> for Light {
    fn from(l: SpotLight) -> Self {
        Light::Spot(l)
    }
}

impl From<DirectionalLight> for Light {
    fn from(l: DirectionalLight) -> Self {
        Light::Directional(l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_grows_with_intensity() {
        let mut last = light_radius(0.0);
        assert_eq!(last, 0.0);
        for i in 1..50 {
            let r = light_radius(i as f32 * 0.5);
            assert!(r > last);
            last = r;
        }
        assert!((light_radius(10.0) - 1000f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn negative_intensity_is_clamped() {
        let l = PointLight::new(Vec3::ZERO).with_intensity(-3.0);
        assert_eq!(l.intensity(), 0.0);
        assert_eq!(l.bounding_volume().extent(), Vec3::ZERO);
    }

    #[test]
    fn volume_follows_position_and_intensity() {
        let mut l = PointLight::new(Vec3::ZERO);
        l.set_position(Vec3::new(5.0, 0.0, 0.0));
        assert!(l.bounding_volume().center().abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-5));

        let before = l.bounding_volume().extent();
        l.set_intensity(40.0);
        let after = l.bounding_volume().extent();
        assert!((after.x - 2.0 * before.x).abs() < 1e-3);
        assert!((after.x - l.radius()).abs() < 1e-3);
    }

    #[test]
    fn spot_direction_from_rotation() {
        let mut l = SpotLight::default();
        assert!(l.direction().abs_diff_eq(Vec3::NEG_Y, 1e-6));
        l.apply_transform(Vec3::Y, Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
        assert!(l.direction().abs_diff_eq(Vec3::X, 1e-5));
        assert!(l.bounding_volume().center().abs_diff_eq(Vec3::Y, 1e-5));
    }

    #[test]
    fn defaults_match_light_kinds() {
        assert_eq!(PointLight::default().intensity(), 10.0);
        assert!((SpotLight::default().angle() - 30f32.to_radians()).abs() < 1e-6);
        let d = DirectionalLight::default();
        assert_eq!(d.intensity(), 0.2);
        assert_eq!(Light::from(d).bounding_volume(), None);
    }
}
