use crate::coord::{cross, Coordinate};

/// A directed boundary segment between two consecutive ring vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Segment {
    pub a: Coordinate,
    pub b: Coordinate,
}

impl Segment {
    #[inline] pub const fn new(a: Coordinate, b: Coordinate) -> Self { Self { a, b } }

    /// Euclidean length in grid units.
    #[inline] pub fn length(&self) -> f64 { self.a.distance(self.b) }

    /// True if both endpoints coincide.
    #[inline] pub fn is_degenerate(&self) -> bool { self.a == self.b }

    /// True if `other` lies on the infinite line through `self`.
    ///
    /// Equivalent to comparing slope and intercept, including vertical lines,
    /// but exact on the integer grid.
    pub fn is_collinear(&self, other: &Segment) -> bool {
        if self.is_degenerate() || other.is_degenerate() { return false }
        cross(self.a, self.b, other.a) == 0 && cross(self.a, self.b, other.b) == 0
    }

    /// True if the segments are collinear and their projections share more
    /// than a single endpoint.
    pub fn overlaps(&self, other: &Segment) -> bool {
        if !self.is_collinear(other) { return false }

        // Project onto the dominant axis of the shared line.
        let (dx, dy) = self.b - self.a;
        let project = |c: Coordinate| if dx.abs() >= dy.abs() { c.x } else { c.y };

        let (s0, s1) = (project(self.a), project(self.b));
        let (o0, o1) = (project(other.a), project(other.b));
        s0.max(s1).min(o0.max(o1)) > s0.min(s1).max(o0.min(o1))
    }

    /// True if `point` lies on the closed segment.
    pub fn contains(&self, point: Coordinate) -> bool {
        cross(self.a, self.b, point) == 0
            && point.x >= self.a.x.min(self.b.x) && point.x <= self.a.x.max(self.b.x)
            && point.y >= self.a.y.min(self.b.y) && point.y <= self.a.y.max(self.b.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(ax: i64, ay: i64, bx: i64, by: i64) -> Segment {
        Segment::new(Coordinate::new(ax, ay), Coordinate::new(bx, by))
    }

    #[test]
    fn shared_edge_in_opposite_directions_overlaps() {
        assert!(seg(1, 0, 1, 1).overlaps(&seg(1, 1, 1, 0)));
    }

    #[test]
    fn partial_overlap_on_diagonal() {
        assert!(seg(0, 0, 4, 4).overlaps(&seg(2, 2, 6, 6)));
        assert!(seg(2, 2, 6, 6).overlaps(&seg(0, 0, 4, 4)));
    }

    #[test]
    fn touching_endpoints_do_not_overlap() {
        assert!(!seg(0, 0, 1, 0).overlaps(&seg(1, 0, 2, 0)));
        assert!(!seg(0, 5, 0, 6).overlaps(&seg(0, 6, 0, 9)));
    }

    #[test]
    fn parallel_segments_are_not_collinear() {
        assert!(!seg(0, 0, 2, 0).is_collinear(&seg(0, 1, 2, 1)));
        assert!(!seg(0, 0, 2, 0).overlaps(&seg(0, 1, 2, 1)));
    }

    #[test]
    fn vertical_collinear_segments() {
        assert!(seg(3, 0, 3, 10).overlaps(&seg(3, 4, 3, 20)));
        assert!(!seg(3, 0, 3, 10).overlaps(&seg(4, 4, 4, 20)));
    }

    #[test]
    fn degenerate_segment_never_overlaps() {
        assert!(!seg(1, 1, 1, 1).overlaps(&seg(0, 0, 2, 2)));
    }

    #[test]
    fn contains_endpoints_and_interior() {
        let s = seg(0, 0, 4, 2);
        assert!(s.contains(Coordinate::new(0, 0)));
        assert!(s.contains(Coordinate::new(2, 1)));
        assert!(!s.contains(Coordinate::new(6, 3)));
    }
}
