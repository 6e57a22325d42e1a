use std::sync::OnceLock;

use ahash::{AHashMap, AHashSet};
use geo::Point;
use geoshape::{bordering, dissolve, Bounded, ShapeIndex};
use tracing::debug;

use crate::{error::{Error, Result}, graph::Graph, types::{District, Party, Precinct}};

/// A connected component of the precinct graph.
#[derive(Debug)]
pub struct Island {
    precincts: Vec<usize>,
    center: Point<f64>,
    boundary: OnceLock<Vec<usize>>,
}

impl Island {
    fn new(precincts: Vec<usize>, all: &[Precinct]) -> Self {
        let n = precincts.len().max(1) as f64;
        let (sx, sy) = precincts.iter()
            .map(|&p| all[p].centroid())
            .fold((0.0, 0.0), |(sx, sy), c| (sx + c.x(), sy + c.y()));
        Self { precincts, center: Point::new(sx / n, sy / n), boundary: OnceLock::new() }
    }

    /// Get the precinct indices on this island, sorted.
    #[inline] pub fn precincts(&self) -> &[usize] { &self.precincts }

    #[inline] pub fn len(&self) -> usize { self.precincts.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.precincts.is_empty() }

    /// Mean of the member precinct centroids.
    #[inline] pub fn center(&self) -> Point<f64> { self.center }
}

/// The immutable input of a run: precincts, their adjacency graph, islands
/// and the districts to be scored.
#[derive(Debug)]
pub struct State {
    precincts: Vec<Precinct>,
    districts: Vec<District>,
    graph: Graph,
    index: ShapeIndex,
    islands: Vec<Island>,
    island_of: Vec<usize>,
    ids: AHashMap<String, usize>,
}

impl State {
    /// Validate the precincts, fold precincts sitting in holes into their
    /// surrounding precinct, and build the adjacency graph and islands.
    pub fn new(precincts: Vec<Precinct>, districts: Vec<District>) -> Result<Self> {
        let precincts = merge_holes(validate(precincts)?);
        let index = ShapeIndex::new(&precincts);
        let graph = Graph::from_shapes_indexed(&precincts, &index);
        let islands = graph.islands();

        debug!(precincts = precincts.len(), edges = graph.edge_count(), islands = islands.len(), "built state");
        Ok(Self::assemble(precincts, districts, graph, index, islands))
    }

    /// Like [`State::new`], but with caller-supplied islands.
    ///
    /// Every precinct must appear on exactly one island, and each island must
    /// be non-empty and connected in the bordering graph. Hole merging is not
    /// applied since it would renumber the supplied indices.
    pub fn with_islands(precincts: Vec<Precinct>, districts: Vec<District>, islands: Vec<Vec<usize>>) -> Result<Self> {
        let precincts = validate(precincts)?;
        let index = ShapeIndex::new(&precincts);
        let graph = Graph::from_shapes_indexed(&precincts, &index);

        let mut seen = vec![false; precincts.len()];
        for (i, island) in islands.iter().enumerate() {
            if island.is_empty() { return Err(Error::EmptyIsland(i)) }
            for &p in island {
                let Some(precinct) = precincts.get(p) else { return Err(Error::UnknownPrecinct(p.to_string())) };
                if seen[p] { return Err(Error::DuplicatePrecinct(precinct.id().to_string())) }
                seen[p] = true;
            }
            if !graph.is_connected(island) { return Err(Error::DisconnectedIsland { island: i }) }
        }
        if let Some(p) = seen.iter().position(|&s| !s) {
            return Err(Error::MissingPrecinct(precincts[p].id().to_string()))
        }

        let islands = islands.into_iter()
            .map(|mut island| { island.sort_unstable(); island })
            .collect();
        Ok(Self::assemble(precincts, districts, graph, index, islands))
    }

    fn assemble(precincts: Vec<Precinct>, districts: Vec<District>, graph: Graph, index: ShapeIndex, islands: Vec<Vec<usize>>) -> Self {
        let mut island_of = vec![0; precincts.len()];
        for (i, island) in islands.iter().enumerate() {
            island.iter().for_each(|&p| island_of[p] = i);
        }
        let ids = precincts.iter().enumerate().map(|(i, p)| (p.id().to_string(), i)).collect();
        let islands = islands.into_iter().map(|island| Island::new(island, &precincts)).collect();

        Self { precincts, districts, graph, index, islands, island_of, ids }
    }

    /// Get the number of precincts.
    #[inline] pub fn len(&self) -> usize { self.precincts.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.precincts.is_empty() }

    #[inline] pub fn precincts(&self) -> &[Precinct] { &self.precincts }

    #[inline] pub fn precinct(&self, p: usize) -> &Precinct { &self.precincts[p] }

    #[inline] pub fn districts(&self) -> &[District] { &self.districts }

    #[inline] pub fn graph(&self) -> &Graph { &self.graph }

    /// Get the R-tree over precinct bounding boxes.
    #[inline] pub fn index(&self) -> &ShapeIndex { &self.index }

    #[inline] pub fn islands(&self) -> &[Island] { &self.islands }

    #[inline] pub fn island(&self, i: usize) -> &Island { &self.islands[i] }

    /// Get the island containing precinct `p`.
    #[inline] pub fn island_of(&self, p: usize) -> usize { self.island_of[p] }

    /// Look up a precinct index by its stable id.
    #[inline] pub fn index_of(&self, id: &str) -> Option<usize> { self.ids.get(id).copied() }

    pub fn total_population(&self) -> u64 { self.precincts.iter().map(Precinct::population).sum() }

    /// Parties with any recorded votes, always including the two major parties.
    pub fn parties(&self) -> Vec<Party> {
        let mut parties = vec![Party::Democrat, Party::Republican];
        parties.extend(self.precincts.iter().flat_map(|p| p.votes().keys().copied()));
        parties.sort_unstable();
        parties.dedup();
        parties
    }

    /// Precincts of island `i` that touch the island's outer border, sorted.
    pub fn island_boundary(&self, i: usize) -> &[usize] {
        let island = &self.islands[i];
        island.boundary.get_or_init(|| {
            let border = dissolve(island.precincts.iter().map(|&p| self.precincts[p].shape()));
            island.precincts.iter().copied()
                .filter(|&p| bordering(&self.precincts[p], &border))
                .collect()
        })
    }
}

/// Reject degenerate precinct geometry and duplicate ids.
fn validate(precincts: Vec<Precinct>) -> Result<Vec<Precinct>> {
    if precincts.is_empty() { return Err(Error::EmptyState) }

    let mut ids = AHashSet::with_capacity(precincts.len());
    for precinct in &precincts {
        precinct.shape().validate().map_err(|source| Error::Geometry { precinct: precinct.id().to_string(), source })?;
        if !ids.insert(precinct.id()) { return Err(Error::DuplicatePrecinct(precinct.id().to_string())) }
    }
    Ok(precincts)
}

/// Fold every precinct lying inside the hull of a precinct with holes into
/// that precinct, summing population and votes. The absorbing precinct keeps
/// its id and loses its holes.
fn merge_holes(mut precincts: Vec<Precinct>) -> Vec<Precinct> {
    let mut holed = (0..precincts.len())
        .filter(|&i| precincts[i].shape().has_holes())
        .collect::<Vec<_>>();
    if holed.is_empty() { return precincts }

    // Outermost first, so nested precincts map straight to the outermost absorber.
    holed.sort_by(|&a, &b| precincts[b].shape().hull.area().total_cmp(&precincts[a].shape().hull.area()));

    let index = ShapeIndex::new(&precincts);
    let mut absorbed_by: Vec<Option<usize>> = vec![None; precincts.len()];
    for &i in &holed {
        if absorbed_by[i].is_some() { continue }
        let Some(bbox) = Bounded::bounding_box(&precincts[i]) else { continue };
        let hull = &precincts[i].shape().hull;
        for j in index.query(&bbox) {
            if j == i || absorbed_by[j].is_some() { continue }
            if precincts[j].shape().hull.inside(hull) { absorbed_by[j] = Some(i) }
        }
    }

    let merged = absorbed_by.iter().filter(|a| a.is_some()).count();
    for (j, absorber) in absorbed_by.iter().enumerate() {
        if let Some(i) = *absorber {
            let inner = precincts[j].clone();
            precincts[i].absorb(&inner);
        }
    }
    for &i in &holed {
        precincts[i].fill_holes();
    }

    debug!(merged, "merged precincts inside holes");
    precincts.into_iter().zip(absorbed_by)
        .filter(|(_, absorber)| absorber.is_none())
        .map(|(precinct, _)| precinct)
        .collect()
}
