use lucerna_core::Color;
use serde::{Deserialize, Serialize};

/// Tunables read once when the [`crate::Renderer`] is built.
///
/// Every field has a default, so a TOML `[renderer]` table may list only the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Vertical field of view applied to cameras created by the app layer.
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// Colour of pixels no geometry or backdrop covers.
    pub clear_color: Color,
    /// Restrict each light's draw to the screen rectangle its volume covers.
    /// Disable to draw every light full screen.
    pub shrink_light_quads: bool,
    /// Initial slot counts for the per-light and per-object uniform arrays.
    pub initial_light_capacity: usize,
    pub initial_object_capacity: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            z_near: 0.1,
            z_far: 1000.0,
            clear_color: Color::BLACK,
            shrink_light_quads: true,
            initial_light_capacity: 64,
            initial_object_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_table_keeps_defaults() {
        let cfg: RendererConfig = toml::from_str("shrink_light_quads = false\nz_far = 500.0").unwrap();
        assert!(!cfg.shrink_light_quads);
        assert_eq!(cfg.z_far, 500.0);
        assert_eq!(cfg.fov_y_degrees, 45.0);
        assert_eq!(cfg.initial_light_capacity, 64);
    }
}
