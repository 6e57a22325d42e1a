mod quantify;

pub use quantify::{
    district_population, home_community, population_from_mask, quantify, quantify_pair, quantify_state,
    votes_from_mask, Quantification, StateQuantification,
};
