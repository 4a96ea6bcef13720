//! Protocell - Evolutionary simulation of genome-encoded cells.
//!
//! Cells carry a symbolic genome plus per-trait reading frames. A trait's
//! value is scored by edit distance between the subsequence its frame
//! selects and a randomly drawn ideal sequence fixed for the run. Rounds
//! of mutation and selection raise a pass threshold toward 1.0 while a
//! diversity filter keeps the surviving gene pool varied.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration types and serializable snapshots
//! - `engine`: Genomes, mutation operators, fitness scoring, selection
//!
//! # Example
//!
//! ```rust,no_run
//! use protocell::{EvolutionEngine, SimulationConfig};
//!
//! let mut config = SimulationConfig::default();
//! config.random_seed = Some(42);
//!
//! let mut engine = EvolutionEngine::new(config).unwrap();
//! let result = engine.run_with_callback(|report| {
//!     println!("{}", report.render());
//! });
//!
//! println!(
//!     "{} survivors after {} rounds",
//!     result.survivors.len(),
//!     result.stats.rounds
//! );
//! ```

pub mod engine;
pub mod schema;

// Re-export commonly used types
pub use engine::{Cell, EvolutionEngine, EvolutionResult, RoundReport, SnapshotWriter};
pub use schema::{CellSnapshot, RoundSnapshot, SimulationConfig};
