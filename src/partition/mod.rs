mod algorithm;
mod communities;
mod community;
mod frame;
mod partition_set;

pub use algorithm::{generate, generate_and_refine, refine, RefineReport};
pub use communities::{changed_precincts, Communities};
pub use community::{schwartzberg, Community, LinkPosition};
pub use frame::CommunityFrame;
pub(crate) use partition_set::PartitionSet;
