#![allow(dead_code)]

use std::collections::BTreeMap;

use communities::{District, Party, Precinct, State, Votes};
use geoshape::{Ring, Shape};

pub fn votes(democrat: u64, republican: u64) -> Votes {
    BTreeMap::from([(Party::Democrat, democrat), (Party::Republican, republican)])
}

/// Unit square precinct at cell `(x, y)`.
pub fn cell(id: impl Into<String>, x: i64, y: i64, population: u64, votes: Votes) -> Precinct {
    Precinct::new(id, Shape::rectangle(x, y, x + 1, y + 1), population, votes)
}

/// `w` by `h` grid of unit precincts, row-major, ids `"x,y"`, 100 people each,
/// with a Democratic share rising from left to right.
pub fn grid_precincts(w: i64, h: i64) -> Vec<Precinct> {
    scaled_grid_precincts(w, h, 1)
}

/// Like [`grid_precincts`], with cells `unit` grid units wide.
pub fn scaled_grid_precincts(w: i64, h: i64, unit: i64) -> Vec<Precinct> {
    (0..h)
        .flat_map(|y| (0..w).map(move |x| (x, y)))
        .map(|(x, y)| {
            let democrat = 30 + 40 * x as u64 / w.max(1) as u64;
            let shape = Shape::rectangle(x * unit, y * unit, (x + 1) * unit, (y + 1) * unit);
            Precinct::new(format!("{x},{y}"), shape, 100, votes(democrat, 100 - democrat))
        })
        .collect()
}

pub fn grid(w: i64, h: i64) -> State {
    State::new(grid_precincts(w, h), Vec::new()).unwrap()
}

/// Row of `n` unit precincts starting at `x0`, ids prefixed with `prefix`.
pub fn row(prefix: &str, x0: i64, n: i64) -> Vec<Precinct> {
    (0..n).map(|i| cell(format!("{prefix}{i}"), x0 + i, 0, 100, votes(50, 50))).collect()
}

/// Island `A` (2 cells at x 0..2) and island `B` (4 cells at x 4..8).
pub fn two_islands() -> State {
    let mut precincts = row("A", 0, 2);
    precincts.extend(row("B", 4, 4));
    State::new(precincts, Vec::new()).unwrap()
}

pub fn rectangle_district(id: &str, x0: i64, y0: i64, x1: i64, y1: i64) -> District {
    District::new(id, Shape::rectangle(x0, y0, x1, y1))
}

/// A 3x3 block with the centre cell cut out as a hole, plus the centre cell itself.
pub fn holed_state() -> State {
    let outer = Shape::new(Ring::rectangle(0, 0, 3, 3), vec![Ring::rectangle(1, 1, 2, 2).reversed()]);
    let precincts = vec![
        Precinct::new("outer", outer, 800, votes(400, 400)),
        cell("inner", 1, 1, 100, votes(70, 30)),
        cell("east", 3, 0, 100, votes(50, 50)),
    ];
    State::new(precincts, Vec::new()).unwrap()
}
