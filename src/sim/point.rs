//! 2D coordinate value type

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// An immutable 2D point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point `fraction` of the way from `self` toward `target`
    #[inline]
    pub fn lerp(self, target: Point, fraction: f64) -> Point {
        DVec2::from(self).lerp(DVec2::from(target), fraction).into()
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        DVec2::from(self).distance(DVec2::from(other))
    }

    /// Arithmetic mean of a set of points (origin when empty)
    pub fn centroid(points: &[Point]) -> Point {
        if points.is_empty() {
            return Point::ORIGIN;
        }
        let sum: DVec2 = points.iter().map(|&p| DVec2::from(p)).sum();
        (sum / points.len() as f64).into()
    }
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Point> for DVec2 {
    fn from(p: Point) -> Self {
        DVec2::new(p.x, p.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}
