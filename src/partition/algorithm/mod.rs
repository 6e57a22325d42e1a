mod compactness;
mod generate;
mod partisan;
mod population;
mod refine;

use compactness::Compactness;
use partisan::Partisan;
use population::Population;

pub use generate::generate;
pub use refine::{generate_and_refine, refine, RefineReport};
