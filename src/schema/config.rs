//! Configuration types for evolutionary simulation runs.

use serde::{Deserialize, Serialize};

/// Name of the trait that controls an individual's own mutation rate.
///
/// The mutation operator reads this trait's score off the cell being
/// mutated, so mutability itself is under selection pressure. Every valid
/// configuration must define it.
pub const MUTATE_TRAIT: &str = "mutate";

fn default_alphabet() -> String {
    "ACGT".to_string()
}

fn default_genome_size() -> usize {
    115
}

fn default_indel_threshold() -> f64 {
    0.1
}

fn default_frame_mutation_scale() -> f64 {
    0.2
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Symbols genomes are built from (ASCII, at least 2 distinct).
    #[serde(default = "default_alphabet")]
    pub alphabet: String,
    /// Length of freshly generated genomes. Mutation drifts lengths away
    /// from this over the course of a run.
    #[serde(default = "default_genome_size")]
    pub genome_size: usize,
    /// Probability that a mutation event is an indel rather than a
    /// substitution; insertions and deletions each get half of it.
    #[serde(default = "default_indel_threshold")]
    pub indel_threshold: f64,
    /// Frame perturbation scale as a fraction of `genome_size`.
    #[serde(default = "default_frame_mutation_scale")]
    pub frame_mutation_scale: f64,
    /// Traits shared by every cell in the run, in order.
    #[serde(default = "TraitConfig::default_set")]
    pub traits: Vec<TraitConfig>,
    /// Population and round settings.
    #[serde(default)]
    pub population: PopulationConfig,
    /// World bounds used only for render-facing cell bodies.
    #[serde(default)]
    pub world: WorldConfig,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            alphabet: default_alphabet(),
            genome_size: default_genome_size(),
            indel_threshold: default_indel_threshold(),
            frame_mutation_scale: default_frame_mutation_scale(),
            traits: TraitConfig::default_set(),
            population: PopulationConfig::default(),
            world: WorldConfig::default(),
            random_seed: None,
        }
    }
}

/// Configuration for a single named trait.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitConfig {
    /// Trait name (e.g. "digest").
    pub name: String,
    /// Length of the randomly generated ideal sequence for this trait.
    pub ideal_size: usize,
    /// Tracked traits feed the selection pass condition, the fitness
    /// ranking, and the diversity filter.
    #[serde(default)]
    pub tracked: bool,
}

impl TraitConfig {
    /// The reference trait set: digest, move, mutate.
    pub fn default_set() -> Vec<Self> {
        vec![
            TraitConfig {
                name: "digest".to_string(),
                ideal_size: 50,
                tracked: true,
            },
            TraitConfig {
                name: "move".to_string(),
                ideal_size: 50,
                tracked: true,
            },
            TraitConfig {
                name: MUTATE_TRAIT.to_string(),
                ideal_size: 15,
                tracked: false,
            },
        ]
    }
}

fn default_initial_cells() -> usize {
    5
}

fn default_children_per_parent() -> usize {
    2000
}

fn default_retention_cap() -> usize {
    200
}

fn default_rounds() -> usize {
    200
}

/// Population and generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of random cells at round 0.
    #[serde(default = "default_initial_cells")]
    pub initial_cells: usize,
    /// Offspring produced by each passing parent per round.
    #[serde(default = "default_children_per_parent")]
    pub children_per_parent: usize,
    /// Maximum survivors admitted by the diversity filter each round.
    #[serde(default = "default_retention_cap")]
    pub retention_cap: usize,
    /// Round count; also the resolution of the threshold ratchet
    /// (round `k` filters at `k / rounds`).
    #[serde(default = "default_rounds")]
    pub rounds: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial_cells: default_initial_cells(),
            children_per_parent: default_children_per_parent(),
            retention_cap: default_retention_cap(),
            rounds: default_rounds(),
        }
    }
}

/// World bounds for cell body placement. Render-facing only; the
/// evolutionary engine never reads these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    pub cell_radius: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 500.0,
            cell_radius: 10.0,
        }
    }
}

impl SimulationConfig {
    /// Alphabet as raw symbols. Validation guarantees ASCII.
    #[inline]
    pub fn symbols(&self) -> &[u8] {
        self.alphabet.as_bytes()
    }

    /// Standard-deviation ceiling for frame endpoint perturbation,
    /// scaled to a fraction of the default genome length.
    #[inline]
    pub fn frame_std_max(&self) -> f64 {
        (self.genome_size as f64 * self.frame_mutation_scale).round()
    }

    /// Names of tracked traits, in configuration order.
    pub fn tracked_traits(&self) -> Vec<String> {
        self.traits
            .iter()
            .filter(|t| t.tracked)
            .map(|t| t.name.clone())
            .collect()
    }

    /// Names of all traits, in configuration order.
    pub fn trait_names(&self) -> Vec<String> {
        self.traits.iter().map(|t| t.name.clone()).collect()
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.alphabet.is_ascii() {
            return Err(ConfigError::NonAsciiAlphabet);
        }
        // Substitution must be able to pick a *different* symbol.
        if self.alphabet.len() < 2 {
            return Err(ConfigError::AlphabetTooSmall);
        }
        let bytes = self.symbols();
        for (i, b) in bytes.iter().enumerate() {
            if bytes[..i].contains(b) {
                return Err(ConfigError::DuplicateSymbol(*b as char));
            }
        }
        if self.genome_size == 0 {
            return Err(ConfigError::InvalidGenomeSize);
        }
        if !(0.0..=1.0).contains(&self.indel_threshold) {
            return Err(ConfigError::InvalidProbability {
                field: "indel_threshold",
                value: self.indel_threshold,
            });
        }
        if !self.frame_mutation_scale.is_finite() || self.frame_mutation_scale < 0.0 {
            return Err(ConfigError::InvalidProbability {
                field: "frame_mutation_scale",
                value: self.frame_mutation_scale,
            });
        }
        if self.traits.is_empty() {
            return Err(ConfigError::NoTraits);
        }
        for (i, t) in self.traits.iter().enumerate() {
            if self.traits[..i].iter().any(|o| o.name == t.name) {
                return Err(ConfigError::DuplicateTrait(t.name.clone()));
            }
            if t.ideal_size == 0 {
                return Err(ConfigError::EmptyIdealSequence {
                    trait_name: t.name.clone(),
                });
            }
        }
        if !self.traits.iter().any(|t| t.name == MUTATE_TRAIT) {
            return Err(ConfigError::MissingMutateTrait);
        }
        if !self.traits.iter().any(|t| t.tracked) {
            return Err(ConfigError::NoTrackedTrait);
        }
        if self.population.rounds == 0 {
            return Err(ConfigError::InvalidRounds);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Alphabet must be ASCII")]
    NonAsciiAlphabet,
    #[error("Alphabet needs at least 2 distinct symbols")]
    AlphabetTooSmall,
    #[error("Alphabet symbol '{0}' appears more than once")]
    DuplicateSymbol(char),
    #[error("Genome size must be non-zero")]
    InvalidGenomeSize,
    #[error("{field} = {value} is not a valid probability")]
    InvalidProbability { field: &'static str, value: f64 },
    #[error("At least one trait must be configured")]
    NoTraits,
    #[error("Trait \"{0}\" is configured more than once")]
    DuplicateTrait(String),
    #[error("Ideal sequence for trait \"{trait_name}\" must be non-empty")]
    EmptyIdealSequence { trait_name: String },
    #[error("A \"mutate\" trait is required")]
    MissingMutateTrait,
    #[error("At least one trait must be tracked")]
    NoTrackedTrait,
    #[error("Round count must be non-zero")]
    InvalidRounds,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.frame_std_max(), 23.0);
        assert_eq!(config.tracked_traits(), vec!["digest", "move"]);
    }

    #[test]
    fn rejects_tiny_alphabet() {
        let config = SimulationConfig {
            alphabet: "A".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::AlphabetTooSmall)
        ));
    }

    #[test]
    fn rejects_duplicate_symbol() {
        let config = SimulationConfig {
            alphabet: "ACGA".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateSymbol('A'))
        ));
    }

    #[test]
    fn rejects_empty_ideal() {
        let mut config = SimulationConfig::default();
        config.traits[0].ideal_size = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyIdealSequence { trait_name }) if trait_name == "digest"
        ));
    }

    #[test]
    fn rejects_missing_mutate_trait() {
        let mut config = SimulationConfig::default();
        config.traits.retain(|t| t.name != MUTATE_TRAIT);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingMutateTrait)
        ));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = SimulationConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.alphabet, config.alphabet);
        assert_eq!(back.population.rounds, config.population.rounds);
    }

    #[test]
    fn defaults_fill_in_missing_fields() {
        let config: SimulationConfig = serde_json::from_str("{}").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.genome_size, 115);
        assert_eq!(config.population.children_per_parent, 2000);
    }
}
