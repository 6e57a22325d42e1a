use std::f64::consts::PI;

use geoshape::{point_distance, Coordinate, Ring};
use tracing::trace;

use crate::partition::{algorithm::refine::{can_leave, Objective}, Communities};

/// Sides of the polygon standing in for a community's equal-area circle.
const CIRCLE_SIDES: usize = 30;

/// Raise the Schwartzberg score of communities by ejecting precincts that
/// stick out of the community's equal-area circle.
pub(crate) struct Compactness {
    pub(crate) tolerance: f64,
}

impl Objective for Compactness {
    fn name(&self) -> &'static str { "compactness" }

    fn excess(&self, communities: &Communities, c: usize) -> Option<f64> {
        let score = communities.schwartzberg(c);
        (score < self.tolerance).then(|| self.tolerance - score)
    }

    fn improve(&self, communities: &mut Communities, community: usize, moved: &mut [bool]) -> usize {
        let center = communities.centroid(community);
        if !(center.x().is_finite() && center.y().is_finite()) { return 0 }
        let radius = (communities.area(community) / PI).sqrt();
        let circle = Ring::regular_polygon(Coordinate::snap(center.x(), center.y()), radius, CIRCLE_SIDES);

        let mut moves = 0;
        for p in communities.boundary_precincts(community) {
            if communities.schwartzberg(community) >= self.tolerance { break }

            let precinct = communities.state().precinct(p);
            if precinct.shape().hull.inside(&circle) { continue }
            if communities.community_of(p) != community || !can_leave(communities, p, moved) { continue }

            let centroid = precinct.centroid();
            let Some(to) = communities.neighbor_communities(p).into_iter()
                .map(|c| (c, point_distance(communities.centroid(c), centroid)))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(c, _)| c)
            else { continue };

            let before = communities.schwartzberg(community);
            communities.move_precinct(p, to);
            if communities.schwartzberg(community) < before {
                communities.move_precinct(p, community);
                continue
            }

            trace!(precinct = p, from = community, to, "compactness exchange");
            moved[p] = true;
            moves += 1;
        }
        moves
    }
}
