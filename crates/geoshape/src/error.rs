use thiserror::Error;

use crate::coord::Coordinate;

/// Degenerate geometry rejected at ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// A ring has fewer than three distinct vertices.
    #[error("ring has {0} vertices, at least 3 are required")]
    TooFewVertices(usize),
    /// Two consecutive ring vertices coincide.
    #[error("duplicate consecutive vertex at {0}")]
    DuplicatePoint(Coordinate),
    /// The hull encloses no area.
    #[error("shape has zero area")]
    ZeroArea,
    /// A hole is not contained in the hull.
    #[error("hole {0} is not contained in the hull")]
    HoleOutsideHull(usize),
}
