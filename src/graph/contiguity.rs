use std::collections::VecDeque;

use crate::graph::Graph;

impl Graph {
    /// Connected components of the whole graph, in order of their lowest node.
    ///
    /// Uses an explicit stack so that long chains of precincts cannot
    /// overflow the call stack.
    pub fn islands(&self) -> Vec<Vec<usize>> {
        let mut islands = Vec::new();
        let mut visited = vec![false; self.node_count()];

        for root in 0..self.node_count() {
            if visited[root] { continue }
            visited[root] = true;

            let mut island = Vec::new();
            let mut stack = vec![root];
            while let Some(u) = stack.pop() {
                island.push(u);
                for v in self.neighbors(u) {
                    if !visited[v] { visited[v] = true; stack.push(v) }
                }
            }
            island.sort_unstable();
            islands.push(island);
        }
        islands
    }

    /// Connected components of the subgraph induced by `nodes`.
    pub fn components(&self, nodes: &[usize]) -> Vec<Vec<usize>> {
        let mut in_set = vec![false; self.node_count()];
        nodes.iter().for_each(|&u| in_set[u] = true);

        let mut components = Vec::new();
        let mut visited = vec![false; self.node_count()];
        for &u in nodes {
            if visited[u] { continue }
            visited[u] = true;

            let mut component = Vec::new();
            let mut queue = VecDeque::from([u]);
            while let Some(v) = queue.pop_front() {
                component.push(v);
                for w in self.neighbors(v) {
                    if in_set[w] && !visited[w] {
                        visited[w] = true;
                        queue.push_back(w);
                    }
                }
            }
            component.sort_unstable();
            components.push(component);
        }
        components
    }

    /// Check if `nodes` induce a connected subgraph (an empty set is connected).
    #[inline]
    pub fn is_connected(&self, nodes: &[usize]) -> bool { self.components(nodes).len() <= 1 }

    /// Check if removing `node` from the set described by `in_set` disconnects
    /// the part of the set that contained it.
    pub fn creates_island(&self, in_set: impl Fn(usize) -> bool, node: usize) -> bool {
        // Collect neighbors that are in the same set.
        let neighbors = self.neighbors(node)
            .filter(|&v| in_set(v))
            .collect::<Vec<_>>();

        // If fewer than 2 same-set neighbors, removing `node` cannot disconnect the set.
        if neighbors.len() <= 1 { return false }

        let mut targets = vec![false; self.node_count()];
        neighbors.iter().for_each(|&v| targets[v] = true);

        // BFS from one neighbor within the set, forbidding `node`.
        let mut visited = vec![false; self.node_count()];
        visited[node] = true;
        visited[neighbors[0]] = true;

        let mut remaining = neighbors.len() - 1;
        let mut queue = VecDeque::from([neighbors[0]]);
        while let Some(u) = queue.pop_front() {
            for v in self.neighbors(u) {
                if !visited[v] && in_set(v) {
                    visited[v] = true;
                    queue.push_back(v);

                    if targets[v] { remaining -= 1; if remaining == 0 { return false } }
                }
            }
        }

        true
    }

    /// Nodes accepted by `eligible` that neighbor some node of `members`, sorted.
    pub fn frontier(&self, members: &[usize], eligible: impl Fn(usize) -> bool) -> Vec<usize> {
        let mut frontier = members.iter()
            .flat_map(|&u| self.neighbors(u))
            .filter(|&v| eligible(v))
            .collect::<Vec<_>>();
        frontier.sort_unstable();
        frontier.dedup();
        frontier
    }
}
