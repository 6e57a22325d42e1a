use std::{fmt, ops::Sub};

use geo::{Coord, Point};
use serde::{Deserialize, Serialize};

/// A fixed-precision planar coordinate.
///
/// Input coordinates (degrees, projected metres, ...) are scaled by
/// [`Coordinate::SCALE`] and rounded onto an integer grid, so that collinearity
/// and crossing tests are exact and clipping results can be snapped back
/// without drift.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i64,
    pub y: i64,
}

impl Coordinate {
    /// Grid units per input unit.
    pub const SCALE: f64 = 1_000_000.0;

    #[inline] pub const fn new(x: i64, y: i64) -> Self { Self { x, y } }

    /// Snap a floating-point input coordinate onto the integer grid.
    #[inline]
    pub fn from_f64(x: f64, y: f64) -> Self {
        Self::new((x * Self::SCALE).round() as i64, (y * Self::SCALE).round() as i64)
    }

    /// Convert back to input units.
    #[inline] pub fn to_f64(self) -> (f64, f64) { (self.x as f64 / Self::SCALE, self.y as f64 / Self::SCALE) }

    /// Snap a grid-unit floating point position (e.g. a clipping result) onto the grid.
    #[inline]
    pub fn snap(x: f64, y: f64) -> Self { Self::new(x.round() as i64, y.round() as i64) }

    /// Euclidean distance in grid units.
    #[inline]
    pub fn distance(self, other: Coordinate) -> f64 {
        ((other.x - self.x) as f64).hypot((other.y - self.y) as f64)
    }

    /// Euclidean distance to a floating point position in grid units.
    #[inline]
    pub fn distance_to(self, point: Point<f64>) -> f64 {
        (point.x() - self.x as f64).hypot(point.y() - self.y as f64)
    }
}

/// 2D cross product of `(b - a) x (c - a)`, exact in `i128`.
#[inline]
pub(crate) fn cross(a: Coordinate, b: Coordinate, c: Coordinate) -> i128 {
    let (abx, aby) = ((b.x - a.x) as i128, (b.y - a.y) as i128);
    let (acx, acy) = ((c.x - a.x) as i128, (c.y - a.y) as i128);
    abx * acy - aby * acx
}

/// Euclidean distance between two floating point positions.
#[inline]
pub fn point_distance(a: Point<f64>, b: Point<f64>) -> f64 {
    (b.x() - a.x()).hypot(b.y() - a.y())
}

impl Sub for Coordinate {
    type Output = (i64, i64);
    #[inline] fn sub(self, rhs: Self) -> Self::Output { (self.x - rhs.x, self.y - rhs.y) }
}

impl From<(i64, i64)> for Coordinate {
    #[inline] fn from((x, y): (i64, i64)) -> Self { Self::new(x, y) }
}

impl From<Coordinate> for Coord<f64> {
    #[inline] fn from(c: Coordinate) -> Self { Coord { x: c.x as f64, y: c.y as f64 } }
}

impl From<Coordinate> for Point<f64> {
    #[inline] fn from(c: Coordinate) -> Self { Point::new(c.x as f64, c.y as f64) }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
