use geo::Point;
use geoshape::{Bounded, MultiShape, Shape};
use serde::{Deserialize, Serialize};

use crate::types::{two_party_ratio, Party, Votes};

/// A voting precinct: a polygon with population and per-party vote counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Precinct {
    id: String,
    shape: Shape,
    population: u64,
    votes: Votes,
}

impl Precinct {
    pub fn new(id: impl Into<String>, shape: Shape, population: u64, votes: Votes) -> Self {
        Self { id: id.into(), shape, population, votes }
    }

    /// Get the stable id.
    #[inline] pub fn id(&self) -> &str { &self.id }

    /// Get the polygon.
    #[inline] pub fn shape(&self) -> &Shape { &self.shape }

    #[inline] pub fn population(&self) -> u64 { self.population }

    #[inline] pub fn votes(&self) -> &Votes { &self.votes }

    /// Votes cast for `party`, zero when absent.
    #[inline] pub fn vote(&self, party: Party) -> u64 { self.votes.get(&party).copied().unwrap_or(0) }

    #[inline] pub fn area(&self) -> f64 { self.shape.area() }

    #[inline] pub fn centroid(&self) -> Point<f64> { self.shape.centroid() }

    /// Republican share of the two-party vote.
    #[inline] pub fn ratio(&self) -> Option<f64> { two_party_ratio(&self.votes) }

    /// Add the population and votes of `other` to this precinct.
    pub(crate) fn absorb(&mut self, other: &Precinct) {
        self.population += other.population;
        for (&party, &count) in &other.votes {
            *self.votes.entry(party).or_insert(0) += count;
        }
    }

    /// Drop all holes, keeping only the hull.
    pub(crate) fn fill_holes(&mut self) { self.shape.holes.clear() }
}

impl Bounded for Precinct {
    fn parts(&self) -> &[Shape] { std::slice::from_ref(&self.shape) }
}

/// An externally supplied electoral district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
    id: String,
    shape: MultiShape,
}

impl District {
    pub fn new(id: impl Into<String>, shape: impl Into<MultiShape>) -> Self {
        Self { id: id.into(), shape: shape.into() }
    }

    #[inline] pub fn id(&self) -> &str { &self.id }

    #[inline] pub fn shape(&self) -> &MultiShape { &self.shape }

    #[inline] pub fn centroid(&self) -> Point<f64> { self.shape.centroid() }
}

impl Bounded for District {
    fn parts(&self) -> &[Shape] { &self.shape.shapes }
}
