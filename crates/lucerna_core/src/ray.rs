//! Half-line with a maximum length, used for picking.

use glam::Vec3;

/// A ray starting at `origin`, travelling along `direction` for at most
/// `length` world units.
///
/// `direction` is not required to be normalised; `t` values returned by
/// intersection tests are expressed in multiples of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub length: f32,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3, length: f32) -> Self {
        Self { origin, direction, length }
    }

    /// Point at parameter `t`.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
