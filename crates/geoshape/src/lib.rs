//! Fixed-precision polygon model for precinct maps.
//!
//! Coordinates live on an integer grid ([`Coordinate::SCALE`] units per input
//! unit) so that the bordering test and point-in-polygon test are exact.
//! Boolean operations go through `geo` and are snapped back onto the grid.

pub mod bbox;
pub mod border;
pub mod clip;
pub mod coord;
pub mod error;
pub mod ring;
pub mod segment;
pub mod shape;

pub use bbox::BoundingBox;
pub use border::{bordering, bordering_shapes, ShapeIndex};
pub use clip::{difference, dissolve, intersection, intersection_area, union};
pub use coord::{point_distance, Coordinate};
pub use error::GeometryError;
pub use ring::{point_in_polygon, Ring};
pub use segment::Segment;
pub use shape::{Bounded, MultiShape, Shape};
