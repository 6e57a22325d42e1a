use std::sync::Arc;

use geo::Point;
use geoshape::point_distance;
use rand::{rngs::StdRng, seq::IndexedRandom, Rng, SeedableRng};
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::{
    config::GenerateConfig,
    error::{Error, Result},
    partition::{Communities, LinkPosition},
    types::State,
};

/// The community sizes still to be handed out: `large` communities of
/// `base + 1` precincts and `small` communities of `base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sizes {
    base: usize,
    large: usize,
    small: usize,
}

impl Sizes {
    fn new(num_precincts: usize, num_communities: usize) -> Self {
        let rem = num_precincts % num_communities;
        Self { base: num_precincts / num_communities, large: rem, small: num_communities - rem }
    }

    /// Counts `(large, small)` of available sizes summing exactly to `total`.
    fn exact(&self, total: usize) -> Option<(usize, usize)> {
        (0..=self.large.min(total / (self.base + 1))).rev().find_map(|a| {
            let rest = total - a * (self.base + 1);
            (rest % self.base == 0 && rest / self.base <= self.small).then_some((a, rest / self.base))
        })
    }

    /// Counts `(large, small)` of available sizes with the largest sum not exceeding `total`.
    fn largest_fit(&self, total: usize) -> (usize, usize) {
        (0..=self.large.min(total / (self.base + 1)))
            .map(|a| (a, self.small.min((total - a * (self.base + 1)) / self.base)))
            .max_by_key(|&(a, b)| (a * (self.base + 1) + b * self.base, std::cmp::Reverse(a)))
            .unwrap_or((0, 0))
    }

    fn take(&mut self, large: usize, small: usize) {
        self.large -= large;
        self.small -= small;
    }

    /// Hand out the next size, larger sizes first.
    fn next(&mut self) -> Option<usize> {
        if self.large > 0 { self.large -= 1; return Some(self.base + 1) }
        if self.small > 0 { self.small -= 1; return Some(self.base) }
        None
    }
}

/// The part of a planned community that lies on one island.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    island: usize,
    size: usize,
    seed: Option<usize>,
}

/// A community before any precinct has been assigned.
#[derive(Debug, Clone, Default)]
struct Plan {
    slots: SmallVec<[Slot; 2]>,
    links: SmallVec<[LinkPosition; 2]>,
}

impl Plan {
    fn whole(island: usize, size: usize) -> Self {
        Self { slots: SmallVec::from_elem(Slot { island, size, seed: None }, 1), links: SmallVec::new() }
    }
}

/// Split the state into `num_communities` contiguous communities of
/// near-equal precinct count.
///
/// Islands that can be covered exactly by whole communities are carved up on
/// their own; the remaining precincts of the other islands are joined into
/// linked communities spanning several islands. Growth is randomised; failed
/// attempts are retried with a fresh seed up to `config.max_attempts` times.
pub fn generate(state: impl Into<Arc<State>>, num_communities: usize, config: &GenerateConfig) -> Result<Communities> {
    let state: Arc<State> = state.into();
    if num_communities == 0 || num_communities > state.len() {
        return Err(Error::CommunityCount { communities: num_communities, precincts: state.len() })
    }

    let (plans, reserved) = plan_communities(&state, num_communities)?;
    let seed = config.seed.unwrap_or_else(|| rand::rng().random());

    let mut error = Error::Generation { community: 0, island: 0, reason: "no attempts were made".into() };
    for attempt in 0..config.max_attempts.max(1) {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(attempt as u64));
        let result = grow(Arc::clone(&state), &plans, &reserved, &mut rng)
            .and_then(|communities| communities.validate().map(|()| communities));

        match result {
            Ok(communities) => {
                info!(communities = num_communities, precincts = state.len(), attempt, "generated communities");
                return Ok(communities)
            }
            Err(e @ (Error::Generation { .. } | Error::InvalidPartition { .. })) => {
                warn!(attempt, error = %e, "community generation attempt failed");
                error = e;
            }
            Err(e) => return Err(e),
        }
    }
    Err(error)
}

/// Size every community and decide which islands it spans, reserving the
/// precincts through which linked communities cross between islands.
fn plan_communities(state: &State, num_communities: usize) -> Result<(Vec<Plan>, Vec<usize>)> {
    let mut sizes = Sizes::new(state.len(), num_communities);
    let base = sizes.base;
    let mut plans = Vec::with_capacity(num_communities);
    let mut leftover = vec![0; state.islands().len()];
    let mut fractional = Vec::new();

    for (i, island) in state.islands().iter().enumerate() {
        if island.is_empty() { return Err(Error::EmptyIsland(i)) }

        let (large, small) = match sizes.exact(island.len()) {
            Some(counts) => counts,
            None => {
                let counts = sizes.largest_fit(island.len());
                leftover[i] = island.len() - counts.0 * (base + 1) - counts.1 * base;
                fractional.push(i);
                counts
            }
        };
        sizes.take(large, small);
        plans.extend((0..large).map(|_| Plan::whole(i, base + 1)));
        plans.extend((0..small).map(|_| Plan::whole(i, base)));
    }
    debug!(whole = plans.len(), fractional = fractional.len(), "sized communities");

    // reserved[p] = community id that owns link precinct p, 0 if none.
    let mut reserved = vec![0; state.len()];
    for &i in &fractional {
        while leftover[i] > 0 {
            let Some(size) = sizes.next() else { break };
            let community = plans.len() + 1;

            let take = leftover[i].min(size);
            leftover[i] -= take;
            let mut plan = Plan::whole(i, take);
            let mut need = size - take;
            let mut current = i;

            while need > 0 {
                let center = state.island(current).center();
                let next = fractional.iter().copied()
                    .filter(|&j| leftover[j] > 0 && plan.slots.iter().all(|s| s.island != j))
                    .min_by(|&a, &b| {
                        point_distance(center, state.island(a).center())
                            .total_cmp(&point_distance(center, state.island(b).center()))
                    })
                    .ok_or_else(|| Error::Generation {
                        community,
                        island: current,
                        reason: format!("{need} precincts short with no fractional island left to link"),
                    })?;

                // Chained links leave from the precinct the previous link arrived at.
                let source = match plan.links.last() {
                    Some(link) => link.target_precinct,
                    None => link_precinct(state, current, state.island(next).center(), &reserved)
                        .ok_or_else(|| Error::Generation { community, island: current, reason: "no link precinct".into() })?,
                };
                reserved[source] = community;
                let target = link_precinct(state, next, center, &reserved)
                    .ok_or_else(|| Error::Generation { community, island: next, reason: "no link precinct".into() })?;
                reserved[target] = community;

                let take = leftover[next].min(need);
                leftover[next] -= take;
                need -= take;

                if plan.links.is_empty() { plan.slots[0].seed = Some(source) }
                plan.slots.push(Slot { island: next, size: take, seed: Some(target) });
                plan.links.push(LinkPosition { source_island: current, source_precinct: source, target_island: next, target_precinct: target });
                debug!(community, from = current, to = next, source, target, "linked islands");
                current = next;
            }
            plans.push(plan);
        }
    }

    Ok((plans, reserved))
}

/// The unreserved precinct on the outer border of `island` nearest `toward`
/// whose removal keeps the rest of the island connected.
fn link_precinct(state: &State, island: usize, toward: Point<f64>, reserved: &[usize]) -> Option<usize> {
    let mut candidates = state.island_boundary(island).iter().copied()
        .filter(|&p| reserved[p] == 0)
        .map(|p| (point_distance(state.precinct(p).centroid(), toward), p))
        .collect::<Vec<_>>();
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let graph = state.graph();
    candidates.into_iter()
        .map(|(_, p)| p)
        .find(|&p| !graph.creates_island(|v| state.island_of(v) == island && reserved[v] == 0, p))
}

/// Assign precincts to every planned community, growing each slot outward
/// from its seed without splitting the unassigned pool.
fn grow(state: Arc<State>, plans: &[Plan], reserved: &[usize], rng: &mut StdRng) -> Result<Communities> {
    let num_communities = plans.len();
    let mut communities = Communities::new(Arc::clone(&state), num_communities);
    let graph = state.graph();

    for (i, plan) in plans.iter().enumerate() {
        let community = i + 1;
        communities.set_links(community, plan.links.iter().copied());

        for slot in plan.slots.iter().filter(|s| s.size > 0) {
            let in_pool = |c: &Communities, v: usize| c.community_of(v) == 0;
            let claimable = |c: &Communities, v: usize| in_pool(c, v) && (reserved[v] == 0 || reserved[v] == community);
            let failure = |reason: &str| Error::Generation { community, island: slot.island, reason: reason.into() };

            let seed = match slot.seed {
                Some(p) => p,
                None => {
                    let candidates = state.island(slot.island).precincts().iter().copied()
                        .filter(|&p| claimable(&communities, p) && reserved[p] == 0)
                        .filter(|&p| !graph.creates_island(|v| in_pool(&communities, v), p))
                        .collect::<Vec<_>>();
                    *candidates.choose(rng).ok_or_else(|| failure("no seed keeps the pool connected"))?
                }
            };
            communities.move_precinct(seed, community);
            let origin = state.precinct(seed).centroid();

            let mut members = vec![seed];
            while members.len() < slot.size {
                let next = graph.frontier(&members, |v| claimable(&communities, v))
                    .into_iter()
                    .filter(|&v| !graph.creates_island(|u| in_pool(&communities, u), v))
                    .map(|v| {
                        let open = graph.neighbors(v).filter(|&u| in_pool(&communities, u)).count();
                        (open, point_distance(state.precinct(v).centroid(), origin), v)
                    })
                    .min_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)).then(a.2.cmp(&b.2)))
                    .map(|(_, _, v)| v)
                    .ok_or_else(|| failure("no frontier precinct keeps the pool connected"))?;

                communities.move_precinct(next, community);
                members.push(next);
            }
        }
    }

    let leftover = communities.sorted_members(0);
    if !leftover.is_empty() {
        debug!(count = leftover.len(), "appending leftover precincts to the last community");
        leftover.into_iter().for_each(|p| communities.move_precinct(p, num_communities));
    }

    Ok(communities)
}
