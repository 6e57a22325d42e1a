use geoshape::GeometryError;
use thiserror::Error;

/// Errors raised while building a state, generating communities, or scoring districts.
#[derive(Debug, Error)]
pub enum Error {
    // ----- input -----

    #[error("state has no precincts")]
    EmptyState,

    #[error("island {0} has no precincts")]
    EmptyIsland(usize),

    #[error("island {island} is not connected")]
    DisconnectedIsland { island: usize },

    #[error("precinct {0} appears more than once")]
    DuplicatePrecinct(String),

    #[error("precinct {0} is missing")]
    MissingPrecinct(String),

    #[error("unknown precinct {0}")]
    UnknownPrecinct(String),

    #[error("cannot make {communities} communities from {precincts} precincts")]
    CommunityCount { communities: usize, precincts: usize },

    #[error("precinct {precinct} has invalid geometry")]
    Geometry {
        precinct: String,
        #[source]
        source: GeometryError,
    },

    // ----- algorithm -----

    #[error("could not fill community {community} on island {island}: {reason}")]
    Generation { community: usize, island: usize, reason: String },

    #[error("community {community} is invalid: {reason}")]
    InvalidPartition { community: usize, reason: String },

    #[error("district {district} does not overlap any community")]
    Quantification { district: String },

    // ----- io -----

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
