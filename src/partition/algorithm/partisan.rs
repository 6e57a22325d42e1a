use tracing::trace;

use crate::partition::{algorithm::refine::{can_leave, Objective}, community::standard_deviation, Communities};

/// Lower the spread of precinct partisan ratios within each community.
pub(crate) struct Partisan {
    pub(crate) tolerance: f64,
}

impl Objective for Partisan {
    fn name(&self) -> &'static str { "partisan" }

    fn excess(&self, communities: &Communities, c: usize) -> Option<f64> {
        let stdev = communities.partisan_stdev(c);
        (stdev > self.tolerance).then(|| stdev - self.tolerance)
    }

    fn improve(&self, communities: &mut Communities, community: usize, moved: &mut [bool]) -> usize {
        let mut moves = 0;

        for p in communities.boundary_precincts(community) {
            let Some(ratio) = communities.state().precinct(p).ratio() else { continue };
            if communities.community_of(p) != community || !can_leave(communities, p, moved) { continue }

            // Only give away precincts whose departure tightens the spread.
            let ratios = &communities.stats(community).ratios;
            let before = standard_deviation(ratios);
            let mut without = ratios.clone();
            if let Some(i) = without.iter().position(|&r| r == ratio) { without.remove(i); }
            if standard_deviation(&without) >= before { continue }

            let Some(to) = communities.neighbor_communities(p).into_iter()
                .map(|c| (c, (communities.partisan_median(c) - ratio).abs()))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(c, _)| c)
            else { continue };

            trace!(precinct = p, from = community, to, "partisan exchange");
            communities.move_precinct(p, to);
            moved[p] = true;
            moves += 1;
        }
        moves
    }
}
