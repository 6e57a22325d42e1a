mod contiguity;
mod graph;

pub use graph::Graph;
