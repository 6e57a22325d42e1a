//! Polygon boolean operations.
//!
//! Clipping is delegated to [`geo::BooleanOps`]. Model coordinates convert to
//! `f64` exactly; results are snapped back onto the integer grid and cleaned
//! of repeated and collinear vertices.

use geo::{Area, BooleanOps, Coord, LineString, MultiPolygon, Polygon};

use crate::{coord::Coordinate, ring::Ring, shape::{Bounded, MultiShape, Shape}};

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

fn ring_to_linestring(ring: &Ring) -> LineString<f64> {
    LineString::new(ring.coords().iter().map(|&c| Coord::from(c)).collect())
}

fn linestring_to_ring(line: &LineString<f64>) -> Option<Ring> {
    let ring = Ring::new(line.0.iter().map(|c| Coordinate::snap(c.x, c.y)).collect()).simplified();
    (ring.len() >= 3 && ring.area() > 0.0).then_some(ring)
}

/// Convert a shape to a `geo` polygon.
pub fn to_polygon(shape: &Shape) -> Polygon<f64> {
    Polygon::new(ring_to_linestring(&shape.hull), shape.holes.iter().map(ring_to_linestring).collect())
}

/// Convert any bounded item to a `geo` multipolygon.
pub fn to_multipolygon<B: Bounded + ?Sized>(item: &B) -> MultiPolygon<f64> {
    MultiPolygon::new(item.parts().iter().map(to_polygon).collect())
}

/// Snap a `geo` multipolygon back onto the grid, dropping collapsed parts.
pub fn from_multipolygon(multi: &MultiPolygon<f64>) -> MultiShape {
    MultiShape::new(multi.0.iter()
        .filter_map(|polygon| {
            let hull = linestring_to_ring(polygon.exterior())?;
            let holes = polygon.interiors().iter().filter_map(linestring_to_ring).collect();
            Some(Shape::new(hull, holes))
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Boolean operations
// ---------------------------------------------------------------------------

pub fn union<A: Bounded + ?Sized, B: Bounded + ?Sized>(a: &A, b: &B) -> MultiShape {
    from_multipolygon(&to_multipolygon(a).union(&to_multipolygon(b)))
}

pub fn intersection<A: Bounded + ?Sized, B: Bounded + ?Sized>(a: &A, b: &B) -> MultiShape {
    from_multipolygon(&to_multipolygon(a).intersection(&to_multipolygon(b)))
}

pub fn difference<A: Bounded + ?Sized, B: Bounded + ?Sized>(a: &A, b: &B) -> MultiShape {
    from_multipolygon(&to_multipolygon(a).difference(&to_multipolygon(b)))
}

/// Area of `a ∩ mask`, computed without snapping the intersection.
pub fn intersection_area<A: Bounded + ?Sized, B: Bounded + ?Sized>(a: &A, mask: &B) -> f64 {
    match (a.bounding_box(), mask.bounding_box()) {
        (Some(ba), Some(bb)) if ba.overlaps(&bb) => {}
        _ => return 0.0,
    }
    to_multipolygon(a).intersection(&to_multipolygon(mask)).unsigned_area()
}

/// Union of all `shapes`, recovering the exterior border(s) of the set.
///
/// Unions are taken pairwise in rounds so that intermediate results stay small.
pub fn dissolve<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> MultiShape {
    let mut layer: Vec<MultiPolygon<f64>> = shapes.into_iter()
        .map(|s| MultiPolygon::new(vec![to_polygon(s)]))
        .collect();

    while layer.len() > 1 {
        let mut next = Vec::with_capacity(layer.len().div_ceil(2));
        let mut iter = layer.into_iter();
        while let Some(a) = iter.next() {
            next.push(match iter.next() {
                Some(b) => a.union(&b),
                None => a,
            });
        }
        layer = next;
    }

    layer.pop().map_or_else(MultiShape::default, |multi| from_multipolygon(&multi))
}
