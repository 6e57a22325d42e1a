use geo::Point;
use serde::{Deserialize, Serialize};

use crate::{bbox::BoundingBox, coord::Coordinate, error::GeometryError, ring::Ring, segment::Segment};

/// A polygon: one outer ring plus zero or more holes strictly inside it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub hull: Ring,
    pub holes: Vec<Ring>,
}

impl Shape {
    pub fn new(hull: Ring, holes: Vec<Ring>) -> Self { Self { hull, holes } }

    pub fn from_hull(hull: Ring) -> Self { Self { hull, holes: Vec::new() } }

    /// Axis-aligned rectangle without holes.
    pub fn rectangle(x0: i64, y0: i64, x1: i64, y1: i64) -> Self { Self::from_hull(Ring::rectangle(x0, y0, x1, y1)) }

    #[inline] pub fn has_holes(&self) -> bool { !self.holes.is_empty() }

    /// Hull area minus hole area.
    pub fn area(&self) -> f64 {
        self.hull.area() - self.holes.iter().map(Ring::area).sum::<f64>()
    }

    /// Length of the hull and every hole boundary.
    pub fn perimeter(&self) -> f64 {
        self.hull.perimeter() + self.holes.iter().map(Ring::perimeter).sum::<f64>()
    }

    /// Area centroid with holes subtracted.
    pub fn centroid(&self) -> Point<f64> {
        if self.holes.is_empty() { return self.hull.centroid() }

        let (hull_area, hull_centroid) = (self.hull.area(), self.hull.centroid());
        let (mut mx, mut my) = (hull_area * hull_centroid.x(), hull_area * hull_centroid.y());
        for hole in &self.holes {
            let (a, c) = (hole.area(), hole.centroid());
            mx -= a * c.x();
            my -= a * c.y();
        }
        let area = self.area();
        if area <= 0.0 { return hull_centroid }
        Point::new(mx / area, my / area)
    }

    #[inline] pub fn bounding_box(&self) -> Option<BoundingBox> { self.hull.bounding_box() }

    /// All boundary segments: hull first, then each hole.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.hull.segments().chain(self.holes.iter().flat_map(Ring::segments))
    }

    /// True if `point` lies strictly inside the hull and outside every hole.
    pub fn contains(&self, point: Coordinate) -> bool {
        self.hull.contains(point) && !self.holes.iter().any(|h| h.contains(point))
    }

    /// Reject rings that are too short, repeat a vertex, enclose no area, or
    /// holes that escape the hull.
    pub fn validate(&self) -> Result<(), GeometryError> {
        check_ring(&self.hull)?;
        if self.hull.area() == 0.0 { return Err(GeometryError::ZeroArea) }

        for (i, hole) in self.holes.iter().enumerate() {
            check_ring(hole)?;
            if !hole.inside(&self.hull) { return Err(GeometryError::HoleOutsideHull(i)) }
        }
        Ok(())
    }
}

fn check_ring(ring: &Ring) -> Result<(), GeometryError> {
    if ring.len() < 3 { return Err(GeometryError::TooFewVertices(ring.len())) }
    match ring.duplicate_vertex() {
        Some(c) => Err(GeometryError::DuplicatePoint(c)),
        None => Ok(()),
    }
}

/// An ordered set of disjoint shapes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MultiShape {
    pub shapes: Vec<Shape>,
}

impl MultiShape {
    pub fn new(shapes: Vec<Shape>) -> Self { Self { shapes } }

    #[inline] pub fn len(&self) -> usize { self.shapes.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.shapes.is_empty() }
    #[inline] pub fn iter(&self) -> std::slice::Iter<'_, Shape> { self.shapes.iter() }

    pub fn area(&self) -> f64 { self.shapes.iter().map(Shape::area).sum() }

    pub fn perimeter(&self) -> f64 { self.shapes.iter().map(Shape::perimeter).sum() }

    /// Area-weighted centroid of all parts.
    pub fn centroid(&self) -> Point<f64> {
        let area = self.area();
        if area <= 0.0 {
            return self.shapes.first().map_or(Point::new(f64::NAN, f64::NAN), Shape::centroid)
        }
        let (mx, my) = self.shapes.iter().fold((0.0, 0.0), |(mx, my), s| {
            let (a, c) = (s.area(), s.centroid());
            (mx + a * c.x(), my + a * c.y())
        });
        Point::new(mx / area, my / area)
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.shapes.iter().filter_map(Shape::bounding_box).reduce(BoundingBox::union)
    }
}

impl From<Shape> for MultiShape {
    fn from(shape: Shape) -> Self { Self { shapes: vec![shape] } }
}

impl<'a> IntoIterator for &'a MultiShape {
    type Item = &'a Shape;
    type IntoIter = std::slice::Iter<'a, Shape>;
    fn into_iter(self) -> Self::IntoIter { self.shapes.iter() }
}

/// Anything made of one or more shapes that can be tested for bordering.
pub trait Bounded {
    /// The polygons making up this item.
    fn parts(&self) -> &[Shape];

    /// Bounding box over all parts.
    fn bounding_box(&self) -> Option<BoundingBox> {
        self.parts().iter().filter_map(Shape::bounding_box).reduce(BoundingBox::union)
    }
}

impl Bounded for Shape {
    fn parts(&self) -> &[Shape] { std::slice::from_ref(self) }
}

impl Bounded for MultiShape {
    fn parts(&self) -> &[Shape] { &self.shapes }
}
