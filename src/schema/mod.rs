//! Configuration and snapshot types for the simulation.

mod config;
mod snapshot;

pub use config::{
    ConfigError, PopulationConfig, SimulationConfig, TraitConfig, WorldConfig, MUTATE_TRAIT,
};
pub use snapshot::{CellSnapshot, RoundSnapshot};
