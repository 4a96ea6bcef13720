//! Engine module - Genomes, mutation, scoring, and selection.

mod cell;
mod fitness;
mod genome;
mod mutation;
mod rng;
mod selection;
mod snapshot;

pub use cell::*;
pub use fitness::*;
pub use genome::*;
pub use mutation::*;
pub use rng::*;
pub use selection::*;
pub use snapshot::*;
