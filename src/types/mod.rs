mod party;
mod precinct;
mod state;

pub use party::{two_party_ratio, Party, Votes};
pub use precinct::{District, Precinct};
pub use state::{Island, State};
