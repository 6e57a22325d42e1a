use rstar::AABB;
use serde::{Deserialize, Serialize};

use crate::coord::Coordinate;

/// An axis-aligned bounding box on the integer grid (inclusive on all sides).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    min: Coordinate,
    max: Coordinate,
}

impl BoundingBox {
    pub fn new(a: Coordinate, b: Coordinate) -> Self {
        Self {
            min: Coordinate::new(a.x.min(b.x), a.y.min(b.y)),
            max: Coordinate::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Smallest box containing every coordinate, or `None` if empty.
    pub fn from_coords<'a>(coords: impl IntoIterator<Item = &'a Coordinate>) -> Option<Self> {
        coords.into_iter().fold(None, |bbox, &c| Some(match bbox {
            None => Self { min: c, max: c },
            Some(b) => b.expand(c),
        }))
    }

    #[inline] pub fn min(&self) -> Coordinate { self.min }
    #[inline] pub fn max(&self) -> Coordinate { self.max }

    /// Grow to include `c`.
    #[inline]
    pub fn expand(self, c: Coordinate) -> Self {
        Self {
            min: Coordinate::new(self.min.x.min(c.x), self.min.y.min(c.y)),
            max: Coordinate::new(self.max.x.max(c.x), self.max.y.max(c.y)),
        }
    }

    /// Smallest box containing both boxes.
    #[inline]
    pub fn union(self, other: Self) -> Self { self.expand(other.min).expand(other.max) }

    /// True if the boxes intersect or touch.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x && other.min.x <= self.max.x
            && self.min.y <= other.max.y && other.min.y <= self.max.y
    }

    /// True if `c` lies inside or on the box.
    #[inline]
    pub fn contains(&self, c: Coordinate) -> bool {
        c.x >= self.min.x && c.x <= self.max.x && c.y >= self.min.y && c.y <= self.max.y
    }

    /// R-tree envelope for this box.
    #[inline]
    pub fn envelope(&self) -> AABB<[i64; 2]> {
        AABB::from_corners([self.min.x, self.min.y], [self.max.x, self.max.y])
    }
}
