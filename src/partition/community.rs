use std::{cell::OnceCell, f64::consts::PI};

use geo::Point;
use geoshape::{dissolve, MultiShape};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::types::{Precinct, Votes};

/// Endpoints of a link joining a community's pieces on two islands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkPosition {
    pub source_island: usize,
    pub source_precinct: usize,
    pub target_island: usize,
    pub target_precinct: usize,
}

/// Aggregate statistics over a community's precincts.
#[derive(Debug, Clone)]
pub(crate) struct Stats {
    pub(crate) population: u64,
    pub(crate) area: f64,
    pub(crate) centroid: Point<f64>,
    pub(crate) votes: Votes,
    pub(crate) ratios: Vec<f64>, // sorted two-party ratios of precincts that have one
}

impl Stats {
    fn compute(precincts: &[Precinct], members: &[usize]) -> Self {
        let mut stats = Self {
            population: 0,
            area: 0.0,
            centroid: Point::new(f64::NAN, f64::NAN),
            votes: Votes::new(),
            ratios: Vec::with_capacity(members.len()),
        };

        let (mut mx, mut my) = (0.0, 0.0);
        for precinct in members.iter().map(|&p| &precincts[p]) {
            let (area, centroid) = (precinct.area(), precinct.centroid());
            stats.population += precinct.population();
            stats.area += area;
            mx += area * centroid.x();
            my += area * centroid.y();
            for (&party, &count) in precinct.votes() {
                *stats.votes.entry(party).or_insert(0) += count;
            }
            stats.ratios.extend(precinct.ratio());
        }
        if stats.area > 0.0 { stats.centroid = Point::new(mx / stats.area, my / stats.area) }
        stats.ratios.sort_by(f64::total_cmp);
        stats
    }

    /// Population standard deviation of the precinct ratios (0 when empty).
    pub(crate) fn stdev(&self) -> f64 { standard_deviation(&self.ratios) }

    /// Median precinct ratio, or 0.5 when no precinct has two-party votes.
    pub(crate) fn median(&self) -> f64 {
        let n = self.ratios.len();
        match n {
            0 => 0.5,
            _ if n % 2 == 1 => self.ratios[n / 2],
            _ => (self.ratios[n / 2 - 1] + self.ratios[n / 2]) / 2.0,
        }
    }
}

/// Population standard deviation.
pub(crate) fn standard_deviation(values: &[f64]) -> f64 {
    if values.is_empty() { return 0.0 }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n).sqrt()
}

/// Schwartzberg compactness: circumference of the equal-area circle over the perimeter.
pub fn schwartzberg(area: f64, perimeter: f64) -> f64 {
    if perimeter == 0.0 { return f64::INFINITY }
    2.0 * PI * (area / PI).sqrt() / perimeter
}

/// Cached derived data for one community. The member list itself lives in
/// the owning [`Communities`](crate::Communities).
#[derive(Debug, Clone, Default)]
pub struct Community {
    links: SmallVec<[LinkPosition; 2]>,
    border: OnceCell<MultiShape>,
    stats: OnceCell<Stats>,
}

impl Community {
    /// Get the island links recorded while generating this community.
    #[inline] pub fn links(&self) -> &[LinkPosition] { &self.links }

    #[inline] pub(crate) fn set_links(&mut self, links: impl IntoIterator<Item = LinkPosition>) {
        self.links = links.into_iter().collect();
    }

    /// Exterior border, dissolved from the members on first use.
    pub(crate) fn border(&self, precincts: &[Precinct], members: &[usize]) -> &MultiShape {
        self.border.get_or_init(|| dissolve(members.iter().map(|&p| precincts[p].shape())))
    }

    pub(crate) fn stats(&self, precincts: &[Precinct], members: &[usize]) -> &Stats {
        self.stats.get_or_init(|| Stats::compute(precincts, members))
    }

    /// Drop cached border and statistics after a membership change.
    #[inline]
    pub(crate) fn invalidate(&mut self) {
        self.border.take();
        self.stats.take();
    }
}
