use tracing::trace;

use crate::partition::{algorithm::refine::{can_leave, touches, Objective}, Communities};

/// Pull community populations toward `aim`, the total population divided
/// by the number of districts.
pub(crate) struct Population {
    pub(crate) tolerance: f64,
    pub(crate) aim: f64,
}

impl Population {
    #[inline]
    fn deviation(&self, communities: &Communities, c: usize) -> f64 {
        communities.population(c) as f64 - self.aim
    }

    #[inline]
    fn within_tolerance(&self, communities: &Communities, c: usize) -> bool {
        self.deviation(communities, c).abs() <= self.tolerance * self.aim
    }

    /// Move `p` from `from` to `to` if that strictly shrinks the deviation of
    /// `worst` (one of the two) without pushing the other community further
    /// from the aim than `worst` ends up.
    fn try_exchange(&self, communities: &mut Communities, p: usize, from: usize, to: usize, worst: usize, moved: &mut [bool]) -> bool {
        if communities.community_of(p) != from || !touches(communities, p, to) || !can_leave(communities, p, moved) {
            return false
        }

        let population = communities.state().precinct(p).population() as f64;
        let (dev_from, dev_to) = (self.deviation(communities, from), self.deviation(communities, to));
        let (after_from, after_to) = ((dev_from - population).abs(), (dev_to + population).abs());
        let (current, after_worst, after_other) = if worst == from {
            (dev_from.abs(), after_from, after_to)
        } else {
            (dev_to.abs(), after_to, after_from)
        };
        if !(after_worst < current && after_other <= after_worst) { return false }

        trace!(precinct = p, from, to, "population exchange");
        communities.move_precinct(p, to);
        moved[p] = true;
        true
    }
}

impl Objective for Population {
    fn name(&self) -> &'static str { "population" }

    fn excess(&self, communities: &Communities, c: usize) -> Option<f64> {
        let dev = self.deviation(communities, c).abs();
        (dev > self.tolerance * self.aim).then(|| dev - self.tolerance * self.aim)
    }

    fn improve(&self, communities: &mut Communities, community: usize, moved: &mut [bool]) -> usize {
        let surplus = self.deviation(communities, community) > 0.0;

        // Surplus communities give to their lightest neighbours first,
        // deficit communities take from their heaviest.
        let mut neighbors = communities.bordering_communities(community);
        neighbors.sort_by_key(|&c| {
            let population = communities.population(c) as i128;
            (if surplus { population } else { -population }, c)
        });

        let mut moves = 0;
        for other in neighbors {
            let (from, to) = if surplus { (community, other) } else { (other, community) };
            let candidates = communities.boundary_precincts(from).into_iter()
                .filter(|&p| touches(communities, p, to))
                .collect::<Vec<_>>();

            for p in candidates {
                if self.within_tolerance(communities, community) { return moves }
                if self.try_exchange(communities, p, from, to, community, moved) { moves += 1 }
            }
        }
        moves
    }
}
