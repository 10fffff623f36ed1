//! Rectangles in normalised device coordinates.

use glam::Vec2;

/// Axis-aligned rectangle in NDC (`x` right, `y` up, both in `[-1, 1]` when
/// on screen).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ScreenRect {
    /// The whole viewport.
    pub const FULLSCREEN: Self = Self {
        min: Vec2::NEG_ONE,
        max: Vec2::ONE,
    };

    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Smallest rectangle enclosing every point; `None` for an empty input.
    pub fn from_points<I: IntoIterator<Item = Vec2>>(points: I) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let (min, max) = it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self { min, max })
    }

    /// `true` when the rectangle lies entirely past one edge of the viewport.
    pub fn is_outside_ndc(&self) -> bool {
        self.max.x < -1.0 || self.min.x > 1.0 || self.max.y < -1.0 || self.min.y > 1.0
    }

    pub fn clamp_to_ndc(&self) -> Self {
        Self {
            min: self.min.clamp(Vec2::NEG_ONE, Vec2::ONE),
            max: self.max.clamp(Vec2::NEG_ONE, Vec2::ONE),
        }
    }

    /// Corner positions in quad vertex order: bottom-left, bottom-right,
    /// top-left, top-right.
    pub fn vertices(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            Vec2::new(self.min.x, self.max.y),
            self.max,
        ]
    }
}

impl Default for ScreenRect {
    fn default() -> Self {
        Self::FULLSCREEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outside_on_any_single_axis() {
        let right = ScreenRect::new(Vec2::new(1.2, -0.5), Vec2::new(3.0, 0.5));
        assert!(right.is_outside_ndc());
        let below = ScreenRect::new(Vec2::new(-0.5, -4.0), Vec2::new(0.5, -1.1));
        assert!(below.is_outside_ndc());
        let straddling = ScreenRect::new(Vec2::new(0.9, -3.0), Vec2::new(3.0, 3.0));
        assert!(!straddling.is_outside_ndc());
    }

    #[test]
    fn touching_the_edge_counts_as_inside() {
        let edge = ScreenRect::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.5));
        assert!(!edge.is_outside_ndc());
    }

    #[test]
    fn from_points_spans_all() {
        let r = ScreenRect::from_points([Vec2::new(0.5, -0.2), Vec2::new(-0.1, 0.7)]).unwrap();
        assert_eq!(r.min, Vec2::new(-0.1, -0.2));
        assert_eq!(r.max, Vec2::new(0.5, 0.7));
        assert!(ScreenRect::from_points(std::iter::empty()).is_none());
    }
}
