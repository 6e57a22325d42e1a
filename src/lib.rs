//! Precinct communities: contiguous, population-balanced groupings of voting
//! precincts, refined for partisan homogeneity and compactness, and used as a
//! yardstick for how far a district map strays from them.
//!
//! A [`State`] owns the precinct geometry, adjacency [`Graph`] and islands.
//! [`generate`] carves it into [`Communities`], [`refine`] exchanges boundary
//! precincts between them, and [`quantify`] scores a [`District`] against the
//! community it mostly covers.
mod config;
mod error;
mod graph;
mod partition;
mod quantify;
mod types;

#[doc(inline)]
pub use config::{Config, GenerateConfig, RefineConfig, Tolerances};

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use graph::Graph;

#[doc(inline)]
pub use partition::{
    changed_precincts, generate, generate_and_refine, refine, schwartzberg, Communities, Community, CommunityFrame,
    LinkPosition, RefineReport,
};

#[doc(inline)]
pub use quantify::{
    district_population, home_community, population_from_mask, quantify, quantify_pair, quantify_state,
    votes_from_mask, Quantification, StateQuantification,
};

#[doc(inline)]
pub use types::{two_party_ratio, District, Island, Party, Precinct, State, Votes};

pub use geoshape;
