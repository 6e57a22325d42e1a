use std::f64::consts::PI;

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::{bbox::BoundingBox, coord::{cross, Coordinate}, segment::Segment};

/// A closed ring of coordinates.
///
/// Closure is implicit: the last vertex connects back to the first, and a
/// trailing copy of the first vertex is stripped on construction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ring(Vec<Coordinate>);

impl Ring {
    /// Construct a ring, dropping an explicit closing vertex if present.
    pub fn new(mut coords: Vec<Coordinate>) -> Self {
        if coords.len() > 1 && coords.first() == coords.last() { coords.pop(); }
        Self(coords)
    }

    /// Axis-aligned rectangle with corners `(x0, y0)` and `(x1, y1)`, counter-clockwise.
    pub fn rectangle(x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        Self(vec![
            Coordinate::new(x0, y0),
            Coordinate::new(x1, y0),
            Coordinate::new(x1, y1),
            Coordinate::new(x0, y1),
        ])
    }

    /// Regular `sides`-gon inscribed in the circle of `radius` around `center`.
    pub fn regular_polygon(center: Coordinate, radius: f64, sides: usize) -> Self {
        Self::new((0..sides)
            .map(|i| {
                let theta = 2.0 * PI * i as f64 / sides as f64;
                Coordinate::snap(center.x as f64 + radius * theta.cos(), center.y as f64 + radius * theta.sin())
            })
            .collect())
    }

    #[inline] pub fn coords(&self) -> &[Coordinate] { &self.0 }
    #[inline] pub fn len(&self) -> usize { self.0.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Iterate over boundary segments, including the closing segment.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.0.len();
        (0..n).map(move |i| Segment::new(self.0[i], self.0[(i + 1) % n]))
    }

    /// Twice the signed area (positive when counter-clockwise), exact.
    fn signed_area2(&self) -> i128 {
        self.segments()
            .map(|s| s.a.x as i128 * s.b.y as i128 - s.b.x as i128 * s.a.y as i128)
            .sum()
    }

    /// Signed shoelace area (positive when counter-clockwise).
    #[inline] pub fn signed_area(&self) -> f64 { self.signed_area2() as f64 / 2.0 }

    /// Unsigned area.
    #[inline] pub fn area(&self) -> f64 { self.signed_area().abs() }

    /// Total length of all segments.
    pub fn perimeter(&self) -> f64 { self.segments().map(|s| s.length()).sum() }

    /// Mean of the vertices.
    pub fn vertex_mean(&self) -> Point<f64> {
        if self.0.is_empty() { return Point::new(f64::NAN, f64::NAN) }
        let n = self.0.len() as f64;
        let (sx, sy) = self.0.iter().fold((0.0, 0.0), |(sx, sy), c| (sx + c.x as f64, sy + c.y as f64));
        Point::new(sx / n, sy / n)
    }

    /// Area centroid; falls back to the vertex mean for zero-area rings.
    pub fn centroid(&self) -> Point<f64> {
        let a2 = self.signed_area2();
        if a2 == 0 { return self.vertex_mean() }

        let (mut cx, mut cy) = (0.0, 0.0);
        for s in self.segments() {
            let f = (s.a.x as i128 * s.b.y as i128 - s.b.x as i128 * s.a.y as i128) as f64;
            cx += (s.a.x + s.b.x) as f64 * f;
            cy += (s.a.y + s.b.y) as f64 * f;
        }
        let a6 = 3.0 * a2 as f64;
        Point::new(cx / a6, cy / a6)
    }

    /// Bounding box, or `None` for an empty ring.
    #[inline] pub fn bounding_box(&self) -> Option<BoundingBox> { BoundingBox::from_coords(&self.0) }

    /// Ray-casting parity test; see [`point_in_polygon`].
    #[inline] pub fn contains(&self, point: Coordinate) -> bool { point_in_polygon(point, &self.0) }

    /// True if `point` lies on one of the ring's segments.
    pub fn on_boundary(&self, point: Coordinate) -> bool { self.segments().any(|s| s.contains(point)) }

    /// True if `point` lies inside or on the ring.
    #[inline] pub fn covers(&self, point: Coordinate) -> bool { self.on_boundary(point) || self.contains(point) }

    /// True if every vertex of `self` lies inside or on `other`.
    pub fn inside(&self, other: &Ring) -> bool {
        !self.0.is_empty() && self.0.iter().all(|&c| other.covers(c))
    }

    /// The same ring, starting from vertex `k`.
    pub fn rotated(&self, k: usize) -> Self {
        let mut coords = self.0.clone();
        let n = coords.len();
        if n > 0 { coords.rotate_left(k % n) }
        Self(coords)
    }

    /// The same ring in reverse vertex order.
    pub fn reversed(&self) -> Self {
        Self(self.0.iter().rev().copied().collect())
    }

    /// Remove consecutive duplicate vertices and vertices on a straight run.
    pub fn simplified(&self) -> Self {
        let mut coords = self.0.clone();
        coords.dedup();
        while coords.len() > 1 && coords.first() == coords.last() { coords.pop(); }

        let mut changed = true;
        while changed && coords.len() > 3 {
            changed = false;
            let n = coords.len();
            if let Some(i) = (0..n).find(|&i| cross(coords[(i + n - 1) % n], coords[i], coords[(i + 1) % n]) == 0) {
                coords.remove(i);
                changed = true;
            }
        }
        Self(coords)
    }

    /// Index of the first repeated consecutive vertex, if any (wrapping).
    pub(crate) fn duplicate_vertex(&self) -> Option<Coordinate> {
        let n = self.0.len();
        (0..n).map(|i| (self.0[i], self.0[(i + 1) % n]))
            .find(|(a, b)| n > 1 && a == b)
            .map(|(a, _)| a)
    }
}

impl From<Vec<Coordinate>> for Ring {
    fn from(coords: Vec<Coordinate>) -> Self { Self::new(coords) }
}

/// Ray-casting point-in-polygon parity test against the ring `ring`.
///
/// A horizontal ray is cast towards `+x`. An edge counts as crossed only if
/// exactly one of its endpoints lies strictly above the ray, so a vertex that
/// sits on the ray is counted once and the result does not depend on which
/// vertex the ring starts from. Crossing positions are compared exactly.
pub fn point_in_polygon(point: Coordinate, ring: &[Coordinate]) -> bool {
    let n = ring.len();
    if n < 3 { return false }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (ring[i], ring[j]);
        if (pi.y > point.y) != (pj.y > point.y) {
            let lhs = (point.x - pi.x) as i128 * (pj.y - pi.y) as i128;
            let rhs = (point.y - pi.y) as i128 * (pj.x - pi.x) as i128;
            let left_of_crossing = if pj.y > pi.y { lhs < rhs } else { lhs > rhs };
            if left_of_crossing { inside = !inside }
        }
        j = i;
    }
    inside
}
