use std::collections::BTreeMap;

use geoshape::{difference, intersection_area, point_distance, Bounded};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{Error, Result},
    partition::Communities,
    types::{District, Party, State},
};

/// How far a district strays from the community it mostly covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantification {
    /// Id of the scored district.
    pub district: String,
    /// The community the district was compared against.
    pub community: usize,
    /// State-wide population inside the district.
    pub district_population: f64,
    /// Population of the community.
    pub community_population: u64,
    /// Population of the community lying outside the district.
    pub residual_population: f64,
    /// Vote share per party within that residual.
    pub ratios: BTreeMap<Party, f64>,
    /// Residual population as a fraction of community population.
    pub absolute: f64,
}

impl Quantification {
    /// Republican residual share scaled by `2 * (0.5 - absolute)`: a single
    /// signed figure folding partisanship and quantification together.
    pub fn collapsed(&self) -> f64 {
        let republican = self.ratios.get(&Party::Republican).copied().unwrap_or(0.0);
        republican * 2.0 * (0.5 - self.absolute)
    }
}

/// District scores for a whole state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateQuantification {
    /// `(district index, community id)` pairs, sorted by district index.
    pub links: Vec<(usize, usize)>,
    /// One score per link, in the same order.
    pub scores: Vec<Quantification>,
}

/// Fraction of precinct `p`'s area inside `mask`.
fn area_fraction<B: Bounded + ?Sized>(state: &State, p: usize, mask: &B) -> f64 {
    let precinct = state.precinct(p);
    let area = precinct.area();
    if area <= 0.0 { return 0.0 }
    (intersection_area(precinct, mask) / area).clamp(0.0, 1.0)
}

/// Population of `precincts` inside `mask`, apportioned by area.
pub fn population_from_mask<B: Bounded + ?Sized>(state: &State, precincts: &[usize], mask: &B) -> f64 {
    precincts.iter()
        .map(|&p| area_fraction(state, p, mask) * state.precinct(p).population() as f64)
        .sum()
}

/// Votes per party of `precincts` inside `mask`, apportioned by area.
pub fn votes_from_mask<B: Bounded + ?Sized>(state: &State, precincts: &[usize], mask: &B) -> BTreeMap<Party, f64> {
    let mut votes = BTreeMap::new();
    for &p in precincts {
        let fraction = area_fraction(state, p, mask);
        if fraction == 0.0 { continue }
        for (&party, &count) in state.precinct(p).votes() {
            *votes.entry(party).or_insert(0.0) += fraction * count as f64;
        }
    }
    votes
}

/// Precincts whose bounding box touches `mask`'s.
fn candidates<B: Bounded + ?Sized>(state: &State, mask: &B) -> Vec<usize> {
    let Some(bbox) = mask.bounding_box() else { return Vec::new() };
    let mut precincts = state.index().query(&bbox).collect::<Vec<_>>();
    precincts.sort_unstable();
    precincts
}

/// State-wide population inside `district`.
pub fn district_population(state: &State, district: &District) -> f64 {
    population_from_mask(state, &candidates(state, district), district)
}

/// The community sharing the most population with `district`.
pub fn home_community(communities: &Communities, district: &District) -> Result<usize> {
    let state = communities.state();
    let mut overlap = vec![0.0; communities.len() + 1];
    for p in candidates(state, district) {
        overlap[communities.community_of(p)] += area_fraction(state, p, district) * state.precinct(p).population() as f64;
    }

    communities.ids()
        .filter(|&c| overlap[c] > 0.0)
        .fold(None, |best: Option<usize>, c| match best {
            Some(b) if overlap[b] >= overlap[c] => best,
            _ => Some(c),
        })
        .ok_or_else(|| Error::Quantification { district: district.id().to_string() })
}

/// Normalise votes to shares over `parties`. With no votes at all the two
/// major parties get 0.5 each and every other party 0.
fn vote_shares(parties: &[Party], votes: &BTreeMap<Party, f64>) -> BTreeMap<Party, f64> {
    let total = parties.iter().map(|p| votes.get(p).copied().unwrap_or(0.0)).sum::<f64>();
    parties.iter()
        .map(|&party| {
            let share = if total > 0.0 {
                votes.get(&party).copied().unwrap_or(0.0) / total
            } else if matches!(party, Party::Democrat | Party::Republican) {
                0.5
            } else {
                0.0
            };
            (party, share)
        })
        .collect()
}

/// Score `district` against a given community.
pub fn quantify_pair(communities: &Communities, district: &District, community: usize) -> Quantification {
    let state = communities.state();
    let members = communities.sorted_members(community);

    let residual = difference(communities.border(community), district);
    let (residual_population, votes) = if residual.is_empty() {
        (0.0, BTreeMap::new())
    } else {
        (population_from_mask(state, &members, &residual), votes_from_mask(state, &members, &residual))
    };

    let community_population = communities.population(community);
    let absolute = match community_population {
        0 => 0.0,
        pop => residual_population / pop as f64,
    };

    Quantification {
        district: district.id().to_string(),
        community,
        district_population: district_population(state, district),
        community_population,
        residual_population,
        ratios: vote_shares(&state.parties(), &votes),
        absolute,
    }
}

/// Score `district` against its home community.
pub fn quantify(communities: &Communities, district: &District) -> Result<Quantification> {
    let community = home_community(communities, district)?;
    let score = quantify_pair(communities, district, community);
    debug!(district = %score.district, community, absolute = score.absolute, "quantified district");
    Ok(score)
}

/// Pair every district of the state with a community by greedy nearest
/// centroids, then score each pair.
pub fn quantify_state(communities: &Communities) -> StateQuantification {
    let districts = communities.state().districts();

    let mut pairs = districts.iter().enumerate()
        .flat_map(|(d, district)| {
            let center = district.centroid();
            communities.ids().map(move |c| (point_distance(center, communities.centroid(c)), d, c))
        })
        .collect::<Vec<_>>();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

    let mut linked_district = vec![false; districts.len()];
    let mut linked_community = vec![false; communities.len() + 1];
    let mut links = Vec::with_capacity(districts.len().min(communities.len()));
    for (_, d, c) in pairs {
        if linked_district[d] || linked_community[c] { continue }
        linked_district[d] = true;
        linked_community[c] = true;
        links.push((d, c));
    }
    links.sort_unstable();

    let scores = links.iter().map(|&(d, c)| quantify_pair(communities, &districts[d], c)).collect();
    StateQuantification { links, scores }
}
