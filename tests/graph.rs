mod common;

use communities::{Graph, State};
use common::{cell, grid, row, votes};

#[test]
fn grid_3x3_adjacency() {
    let state = grid(3, 3);
    let graph = state.graph();
    assert_eq!(graph.node_count(), 9);
    assert_eq!(graph.edge_count(), 12);

    let mut degrees = (0..9).map(|p| graph.degree(p)).collect::<Vec<_>>();
    degrees.sort_unstable();
    assert_eq!(degrees, [2, 2, 2, 2, 3, 3, 3, 3, 4]);

    // Diagonal neighbours only touch at a corner.
    let centre = state.index_of("1,1").unwrap();
    let corner = state.index_of("0,0").unwrap();
    assert!(!graph.is_edge(centre, corner));
    assert!(graph.is_edge(centre, state.index_of("0,1").unwrap()));
}

#[test]
fn adjacency_is_symmetric() {
    let state = grid(4, 3);
    let graph = state.graph();
    for a in 0..graph.node_count() {
        for b in graph.neighbors(a) {
            assert!(graph.is_edge(b, a), "{a} -> {b} has no reverse edge");
        }
    }
}

#[test]
fn separated_rows_form_islands() {
    let mut precincts = row("A", 0, 3);
    precincts.extend(row("B", 10, 2));
    precincts.push(cell("C", 20, 20, 100, votes(1, 1)));
    let state = State::new(precincts, Vec::new()).unwrap();

    assert_eq!(state.islands().len(), 3);
    let sizes = state.islands().iter().map(|i| i.len()).collect::<Vec<_>>();
    assert_eq!(sizes, [3, 2, 1]);
    assert_eq!(state.island_of(state.index_of("B1").unwrap()), 1);
}

#[test]
fn from_shapes_matches_indexed_construction() {
    let precincts = common::grid_precincts(5, 2);
    let plain = Graph::from_shapes(&precincts);
    let state = State::new(precincts, Vec::new()).unwrap();
    for p in 0..state.len() {
        assert_eq!(plain.neighbors(p).collect::<Vec<_>>(), state.graph().neighbors(p).collect::<Vec<_>>());
    }
}

#[test]
fn island_boundary_excludes_interior() {
    let state = grid(3, 3);
    let boundary = state.island_boundary(0);
    assert_eq!(boundary.len(), 8);
    assert!(!boundary.contains(&state.index_of("1,1").unwrap()));
}
