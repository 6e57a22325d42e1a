use rstar::{RTree, RTreeObject, AABB};

use crate::{bbox::BoundingBox, shape::Bounded};

/// True if some boundary segment of `a` overlaps a boundary segment of `b`.
///
/// Touching at a single point is not bordering.
pub fn bordering<A: Bounded + ?Sized, B: Bounded + ?Sized>(a: &A, b: &B) -> bool {
    match (a.bounding_box(), b.bounding_box()) {
        (Some(ba), Some(bb)) if ba.overlaps(&bb) => {}
        _ => return false,
    }

    a.parts().iter().any(|pa| b.parts().iter().any(|pb| {
        match (pa.bounding_box(), pb.bounding_box()) {
            (Some(ba), Some(bb)) if ba.overlaps(&bb) => {}
            _ => return false,
        }
        pa.segments().any(|sa| pb.segments().any(|sb| sa.overlaps(&sb)))
    }))
}

/// Indices of all `items` that border `shape`.
pub fn bordering_shapes<T: Bounded, S: Bounded + ?Sized>(items: &[T], shape: &S) -> Vec<usize> {
    items.iter().enumerate()
        .filter(|(_, item)| bordering(*item, shape))
        .map(|(i, _)| i)
        .collect()
}

/// A bounding box in an R-tree, associated with an item by index.
#[derive(Debug, Clone)]
struct IndexedBox {
    idx: usize,
    bbox: BoundingBox,
}

impl RTreeObject for IndexedBox {
    type Envelope = AABB<[i64; 2]>;

    fn envelope(&self) -> Self::Envelope { self.bbox.envelope() }
}

/// R-tree over the bounding boxes of a slice of shapes.
#[derive(Debug, Clone)]
pub struct ShapeIndex {
    rtree: RTree<IndexedBox>,
}

impl ShapeIndex {
    /// Bulk-load an index over `items`; items without a bounding box are skipped.
    pub fn new<T: Bounded>(items: &[T]) -> Self {
        Self {
            rtree: RTree::bulk_load(items.iter().enumerate()
                .filter_map(|(idx, item)| item.bounding_box().map(|bbox| IndexedBox { idx, bbox }))
                .collect()),
        }
    }

    /// Indices of items whose bounding box intersects or touches `bbox`.
    pub fn query(&self, bbox: &BoundingBox) -> impl Iterator<Item = usize> + '_ {
        self.rtree.locate_in_envelope_intersecting(&bbox.envelope()).map(|b| b.idx)
    }

    /// All unordered pairs `(i, j)`, `i < j`, of bordering items, sorted.
    pub fn bordering_pairs<T: Bounded>(&self, items: &[T]) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, item) in items.iter().enumerate() {
            let Some(bbox) = item.bounding_box() else { continue };
            for j in self.query(&bbox) {
                if j <= i { continue } // check each unordered pair once
                if bordering(item, &items[j]) { pairs.push((i, j)) }
            }
        }
        pairs.sort_unstable();
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{MultiShape, Shape};

    #[test]
    fn shared_edge_borders() {
        let (a, b) = (Shape::rectangle(0, 0, 1, 1), Shape::rectangle(1, 0, 2, 1));
        assert!(bordering(&a, &b) && bordering(&b, &a));
    }

    #[test]
    fn corner_touch_does_not_border() {
        let (a, b) = (Shape::rectangle(0, 0, 1, 1), Shape::rectangle(1, 1, 2, 2));
        assert!(!bordering(&a, &b));
    }

    #[test]
    fn partial_edge_overlap_borders() {
        let (a, b) = (Shape::rectangle(0, 0, 2, 2), Shape::rectangle(2, 1, 4, 5));
        assert!(bordering(&a, &b));
    }

    #[test]
    fn multishape_borders_through_any_part() {
        let multi = MultiShape::new(vec![Shape::rectangle(10, 10, 11, 11), Shape::rectangle(0, 0, 1, 1)]);
        assert!(bordering(&multi, &Shape::rectangle(0, 1, 1, 2)));
        assert!(!bordering(&multi, &Shape::rectangle(5, 5, 6, 6)));
    }

    #[test]
    fn index_finds_grid_pairs() {
        let cells: Vec<Shape> = (0..2).flat_map(|y| (0..2).map(move |x| Shape::rectangle(x, y, x + 1, y + 1))).collect();
        let index = ShapeIndex::new(&cells);
        assert_eq!(index.bordering_pairs(&cells), vec![(0, 1), (0, 2), (1, 3), (2, 3)]);
        assert_eq!(bordering_shapes(&cells, &Shape::rectangle(2, 0, 3, 1)), vec![1]);
    }
}
