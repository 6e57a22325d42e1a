use std::sync::Arc;

use geo::Point;
use geoshape::MultiShape;

use crate::{
    error::{Error, Result},
    partition::{community::{schwartzberg, Stats}, Community, LinkPosition, PartitionSet},
    types::{State, Votes},
};

/// An assignment of every precinct in a [`State`] to one of `k` communities.
///
/// Communities are numbered `1..=k`; id 0 is the pool of unassigned precincts,
/// which is empty once generation has finished.
#[derive(Debug, Clone)]
pub struct Communities {
    state: Arc<State>,
    parts: PartitionSet,
    records: Vec<Community>, // records[0] belongs to the pool
}

impl Communities {
    /// Create `num_communities` empty communities with every precinct in the pool.
    pub fn new(state: impl Into<Arc<State>>, num_communities: usize) -> Self {
        let state: Arc<State> = state.into();
        Self {
            parts: PartitionSet::new(num_communities + 1, state.len()),
            records: vec![Community::default(); num_communities + 1],
            state,
        }
    }

    /// Get the state these communities partition.
    #[inline] pub fn state(&self) -> &State { &self.state }

    /// Get a shared handle to the state.
    #[inline] pub fn state_handle(&self) -> Arc<State> { Arc::clone(&self.state) }

    /// Get the number of communities (excluding the pool).
    #[inline] pub fn len(&self) -> usize { self.parts.num_sets() - 1 }

    #[inline] pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Iterate over community ids `1..=k`.
    #[inline] pub fn ids(&self) -> std::ops::RangeInclusive<usize> { 1..=self.len() }

    /// Get the members of community `c` (or the pool for `c == 0`), in no particular order.
    #[inline] pub fn members(&self, c: usize) -> &[usize] { self.parts.get(c) }

    /// Get the members of community `c`, sorted.
    pub fn sorted_members(&self, c: usize) -> Vec<usize> {
        let mut members = self.parts.get(c).to_vec();
        members.sort_unstable();
        members
    }

    /// Get the community containing precinct `p` (0 if unassigned).
    #[inline] pub fn community_of(&self, p: usize) -> usize { self.parts.find(p) }

    /// Get the community of every precinct, indexed by precinct.
    #[inline] pub fn assignments(&self) -> &[usize] { self.parts.assignments() }

    /// Get the cached record for community `c`.
    #[inline] pub fn community(&self, c: usize) -> &Community { &self.records[c] }

    /// Get the island links recorded for community `c`.
    #[inline] pub fn links(&self, c: usize) -> &[LinkPosition] { self.records[c].links() }

    pub(crate) fn set_links(&mut self, c: usize, links: impl IntoIterator<Item = LinkPosition>) {
        self.records[c].set_links(links);
    }

    /// Move precinct `p` into community `to`. This is the only way membership changes.
    pub fn move_precinct(&mut self, p: usize, to: usize) {
        let from = self.parts.move_to(p, to);
        if from == to { return }
        self.records[from].invalidate();
        self.records[to].invalidate();
    }

    /// Reassign every precinct at once.
    pub(crate) fn set_assignments(&mut self, assignments: &[usize]) {
        self.parts.rebuild(assignments);
        self.records.iter_mut().for_each(Community::invalidate);
    }

    // ----- cached metrics -----

    #[inline]
    pub(crate) fn stats(&self, c: usize) -> &Stats {
        self.records[c].stats(self.state.precincts(), self.parts.get(c))
    }

    /// Exterior border of community `c`, dissolved from its precincts.
    #[inline]
    pub fn border(&self, c: usize) -> &MultiShape {
        self.records[c].border(self.state.precincts(), self.parts.get(c))
    }

    #[inline] pub fn population(&self, c: usize) -> u64 { self.stats(c).population }

    #[inline] pub fn area(&self, c: usize) -> f64 { self.stats(c).area }

    /// Area-weighted centroid of the community's precincts.
    #[inline] pub fn centroid(&self, c: usize) -> Point<f64> { self.stats(c).centroid }

    #[inline] pub fn votes(&self, c: usize) -> &Votes { &self.stats(c).votes }

    /// Standard deviation of the members' two-party ratios.
    #[inline] pub fn partisan_stdev(&self, c: usize) -> f64 { self.stats(c).stdev() }

    /// Median of the members' two-party ratios.
    #[inline] pub fn partisan_median(&self, c: usize) -> f64 { self.stats(c).median() }

    /// Schwartzberg score of the dissolved border.
    pub fn schwartzberg(&self, c: usize) -> f64 {
        schwartzberg(self.area(c), self.border(c).perimeter())
    }

    // ----- adjacency -----

    /// Communities other than `p`'s own that border precinct `p`, sorted.
    pub fn neighbor_communities(&self, p: usize) -> Vec<usize> {
        let own = self.community_of(p);
        let mut communities = self.state.graph().neighbors(p)
            .map(|v| self.community_of(v))
            .filter(|&c| c != own && c != 0)
            .collect::<Vec<_>>();
        communities.sort_unstable();
        communities.dedup();
        communities
    }

    /// Communities bordering community `c`, sorted.
    pub fn bordering_communities(&self, c: usize) -> Vec<usize> {
        let graph = self.state.graph();
        let mut communities = self.members(c).iter()
            .flat_map(|&u| graph.neighbors(u))
            .map(|v| self.community_of(v))
            .filter(|&d| d != c && d != 0)
            .collect::<Vec<_>>();
        communities.sort_unstable();
        communities.dedup();
        communities
    }

    /// Members of `c` that border another community, sorted.
    pub fn boundary_precincts(&self, c: usize) -> Vec<usize> {
        let graph = self.state.graph();
        let mut boundary = self.members(c).iter().copied()
            .filter(|&u| graph.neighbors(u).any(|v| { let d = self.community_of(v); d != c && d != 0 }))
            .collect::<Vec<_>>();
        boundary.sort_unstable();
        boundary
    }

    /// Check if removing `p` from its community would split the community on `p`'s island.
    pub fn creates_island(&self, p: usize) -> bool {
        let c = self.community_of(p);
        self.state.graph().creates_island(|v| self.community_of(v) == c, p)
    }

    // ----- comparison and validation -----

    /// Number of precincts assigned to different communities in `other`.
    pub fn measure_difference(&self, other: &Communities) -> usize {
        changed_precincts(self.assignments(), other.assignments())
    }

    /// Check that every precinct is assigned, no community is empty, and
    /// each community is connected within every island it touches.
    pub fn validate(&self) -> Result<()> {
        let unassigned = self.members(0).len();
        if unassigned > 0 {
            return Err(Error::InvalidPartition { community: 0, reason: format!("{unassigned} precincts are unassigned") })
        }

        for c in self.ids() {
            let mut members = self.sorted_members(c);
            if members.is_empty() {
                return Err(Error::InvalidPartition { community: c, reason: "community is empty".into() })
            }

            members.sort_by_key(|&p| self.state.island_of(p));
            for group in members.chunk_by(|&a, &b| self.state.island_of(a) == self.state.island_of(b)) {
                if !self.state.graph().is_connected(group) {
                    let island = self.state.island_of(group[0]);
                    return Err(Error::InvalidPartition { community: c, reason: format!("not connected on island {island}") })
                }
            }
        }
        Ok(())
    }
}

/// Count positions where two assignment vectors differ.
pub fn changed_precincts(before: &[usize], after: &[usize]) -> usize {
    before.iter().zip(after).filter(|(a, b)| a != b).count()
}
