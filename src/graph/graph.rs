use geoshape::{Bounded, ShapeIndex};

/// An undirected precinct adjacency graph in compressed sparse row format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    size: usize,
    offsets: Vec<u32>,
    edges: Vec<u32>,
}

impl Graph {
    /// Construct a graph from symmetric adjacency lists.
    pub fn new(num_nodes: usize, edges: &[Vec<u32>]) -> Self {
        assert!(edges.len() == num_nodes, "edges.len() must equal num_nodes");

        Self {
            size: num_nodes,
            offsets: std::iter::once(0u32).chain(
                edges.iter()
                    .map(|v| v.len() as u32)
                    .scan(0u32, |acc, len| {*acc += len; Some(*acc)})
            ).collect::<Vec<u32>>(),
            edges: edges.iter().flatten().copied().collect(),
        }
    }

    /// Construct a graph from unordered node pairs; each neighbour list is sorted.
    pub fn from_pairs(num_nodes: usize, pairs: &[(usize, usize)]) -> Self {
        let mut edges = vec![Vec::new(); num_nodes];
        for &(a, b) in pairs {
            assert!(a < num_nodes && b < num_nodes, "edge ({a}, {b}) out of range");
            if a == b { continue }
            edges[a].push(b as u32);
            edges[b].push(a as u32);
        }
        edges.iter_mut().for_each(|v| { v.sort_unstable(); v.dedup() });
        Self::new(num_nodes, &edges)
    }

    /// Build the bordering graph over `items`, pre-filtered by an R-tree.
    pub fn from_shapes<T: Bounded>(items: &[T]) -> Self {
        Self::from_shapes_indexed(items, &ShapeIndex::new(items))
    }

    /// Build the bordering graph over `items` using an existing index.
    pub fn from_shapes_indexed<T: Bounded>(items: &[T], index: &ShapeIndex) -> Self {
        Self::from_pairs(items.len(), &index.bordering_pairs(items))
    }

    /// Get the number of nodes in the graph.
    #[inline] pub fn node_count(&self) -> usize { self.size }

    /// Get the number of undirected edges in the graph.
    #[inline] pub fn edge_count(&self) -> usize { self.edges.len() / 2 }

    /// Get the range of edges for a given node.
    #[inline]
    fn range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize .. self.offsets[node + 1] as usize
    }

    /// Get the degree (number of neighbors) of a given node.
    #[inline] pub fn degree(&self, node: usize) -> usize { self.range(node).len() }

    /// Get the ith neighbor of a given node.
    #[inline]
    pub fn edge(&self, node: usize, i: usize) -> Option<usize> {
        self.range(node).nth(i).map(|v| self.edges[v] as usize)
    }

    /// Get an iterator over the neighbors of a given node.
    #[inline]
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.range(node).map(move |v| self.edges[v] as usize)
    }

    /// Check whether two nodes share an edge.
    #[inline]
    pub fn is_edge(&self, a: usize, b: usize) -> bool { self.neighbors(a).any(|v| v == b) }
}
