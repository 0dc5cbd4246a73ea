//! Planar geometry shared by the simulation systems.
//!
//! World space uses screen conventions: `x` grows to the right and `y` grows
//! downwards. Facing angles are measured in degrees with 0° pointing up the
//! screen and positive angles turning clockwise.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    min: Vec2,
    max: Vec2,
}

impl Rect {
    /// Creates a rectangle from its upper-left corner and size.
    ///
    /// Negative sizes are clamped to zero so that the rectangle never inverts.
    #[must_use]
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self {
            min,
            max: min + size.max(Vec2::ZERO),
        }
    }

    /// Creates a square centred on `center` that extends `half_extent` along each axis.
    #[must_use]
    pub fn around(center: Vec2, half_extent: f32) -> Self {
        let half = Vec2::splat(half_extent.max(0.0));
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Upper-left corner of the rectangle.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Lower-right corner of the rectangle.
    #[must_use]
    pub const fn max(&self) -> Vec2 {
        self.max
    }

    /// Width of the rectangle in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height of the rectangle in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Geometric centre of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Reports whether the point lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Reports whether two rectangles overlap or touch.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Returns the rectangle grown by `margin` on every side.
    #[must_use]
    pub fn expanded(&self, margin: f32) -> Self {
        let margin = Vec2::splat(margin);
        Self {
            min: self.min - margin,
            max: self.max + margin,
        }
    }

    /// Projects the point onto the rectangle.
    #[must_use]
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }

    /// Splits the rectangle into its north-west, north-east, south-west and
    /// south-east quadrants, in that order.
    #[must_use]
    pub fn quadrants(&self) -> [Rect; 4] {
        let center = self.center();
        [
            Rect {
                min: self.min,
                max: center,
            },
            Rect {
                min: Vec2::new(center.x, self.min.y),
                max: Vec2::new(self.max.x, center.y),
            },
            Rect {
                min: Vec2::new(self.min.x, center.y),
                max: Vec2::new(center.x, self.max.y),
            },
            Rect {
                min: center,
                max: self.max,
            },
        ]
    }
}

/// Circular region such as a map end-point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    center: Vec2,
    radius: f32,
}

impl Circle {
    /// Creates a circle; negative radii collapse to zero.
    #[must_use]
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    /// Centre of the circle.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// Radius of the circle.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Reports whether the point lies inside the circle, boundary included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance(point) <= self.radius
    }
}

/// Wraps an angle difference into the half-open interval (−180°, 180°].
#[must_use]
pub fn normalize_degrees(delta: f32) -> f32 {
    let mut wrapped = delta % 360.0;
    if wrapped > 180.0 {
        wrapped -= 360.0;
    } else if wrapped <= -180.0 {
        wrapped += 360.0;
    }
    wrapped
}

/// Facing angle, in degrees, of a direction vector.
///
/// A zero vector yields 0°.
#[must_use]
pub fn facing_degrees(direction: Vec2) -> f32 {
    if direction == Vec2::ZERO {
        return 0.0;
    }
    direction.y.atan2(direction.x).to_degrees() + 90.0
}

/// Unit vector pointing along the provided facing angle.
#[must_use]
pub fn direction_from_degrees(degrees: f32) -> Vec2 {
    let radians = (degrees - 90.0).to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn normalization_keeps_half_open_interval() {
        assert!(approx(normalize_degrees(180.0), 180.0));
        assert!(approx(normalize_degrees(-180.0), 180.0));
        assert!(approx(normalize_degrees(270.0), -90.0));
        assert!(approx(normalize_degrees(-270.0), 90.0));
        assert!(approx(normalize_degrees(725.0), 5.0));
    }

    #[test]
    fn facing_zero_points_up() {
        let up = direction_from_degrees(0.0);
        assert!(approx(up.x, 0.0));
        assert!(approx(up.y, -1.0));
        assert!(approx(facing_degrees(Vec2::new(1.0, 0.0)), 90.0));
        assert!(approx(facing_degrees(Vec2::new(0.0, -1.0)), 0.0));
    }

    #[test]
    fn quadrants_tile_the_parent() {
        let rect = Rect::from_min_size(Vec2::ZERO, Vec2::new(800.0, 600.0));
        let [nw, ne, sw, se] = rect.quadrants();
        assert_eq!(nw.max(), Vec2::new(400.0, 300.0));
        assert_eq!(ne.min(), Vec2::new(400.0, 0.0));
        assert_eq!(sw.min(), Vec2::new(0.0, 300.0));
        assert_eq!(se.max(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn touching_rectangles_intersect() {
        let left = Rect::from_min_size(Vec2::ZERO, Vec2::splat(10.0));
        let right = Rect::from_min_size(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let far = Rect::from_min_size(Vec2::new(30.0, 30.0), Vec2::splat(1.0));
        assert!(left.intersects(&right));
        assert!(!left.intersects(&far));
    }

    #[test]
    fn circle_boundary_is_inside() {
        let circle = Circle::new(Vec2::new(10.0, 10.0), 5.0);
        assert!(circle.contains(Vec2::new(15.0, 10.0)));
        assert!(!circle.contains(Vec2::new(15.1, 10.0)));
    }
}
