//! The cell: the unit of evolution.

use std::collections::HashMap;

use crate::schema::{CellSnapshot, SimulationConfig};

use super::fitness::{similarity, IdealSequences};
use super::genome::{extract, random_genome, Frame};
use super::mutation::MutationBundle;
use super::rng::EngineRng;

/// Render-facing attributes of a cell.
///
/// Consumed by external visualization only; the engine never reads them,
/// so they cannot influence scoring or selection.
#[derive(Debug, Clone)]
pub struct Body {
    pub position: [f64; 2],
    pub radius: f64,
    pub color: String,
}

impl Body {
    /// New body at the world center with a random color.
    pub fn random(rng: &mut EngineRng, config: &SimulationConfig) -> Self {
        let color = format!("#{:02X}{:02X}{:02X}", rng.byte(), rng.byte(), rng.byte());
        Self {
            position: [config.world.width / 2.0, config.world.height / 2.0],
            radius: config.world.cell_radius,
            color,
        }
    }
}

/// A genome-encoded individual.
///
/// The trait list is immutable after construction; genome and frames
/// change only by constructing a *new* cell from a [`MutationBundle`].
#[derive(Debug, Clone)]
pub struct Cell {
    id: u64,
    genome: String,
    traits: Vec<String>,
    frames: HashMap<String, Frame>,
    scores: HashMap<String, f64>,
    body: Body,
}

impl Cell {
    /// Create a cell with a random genome and random frames.
    ///
    /// Scores start empty; call [`Cell::compute_scores`] (the engine does
    /// this immediately after construction).
    pub fn random(
        id: u64,
        traits: Vec<String>,
        config: &SimulationConfig,
        rng: &mut EngineRng,
    ) -> Self {
        let genome = random_genome(rng, config.genome_size, config.symbols());
        Self::from_parts(id, traits, genome, HashMap::new(), config, rng)
    }

    /// Create a child cell from a mutation bundle.
    pub fn from_bundle(
        id: u64,
        traits: Vec<String>,
        bundle: MutationBundle,
        config: &SimulationConfig,
        rng: &mut EngineRng,
    ) -> Self {
        Self::from_parts(id, traits, bundle.genome, bundle.frames, config, rng)
    }

    /// Create a cell from an explicit genome and frame map. Traits
    /// missing from `frames` get a random frame drawn over the genome.
    pub fn from_parts(
        id: u64,
        traits: Vec<String>,
        genome: String,
        mut frames: HashMap<String, Frame>,
        config: &SimulationConfig,
        rng: &mut EngineRng,
    ) -> Self {
        let genome_len = genome.len();
        let frames = traits
            .iter()
            .map(|name| {
                let frame = frames
                    .remove(name)
                    .unwrap_or_else(|| Frame::random(rng, genome_len));
                (name.clone(), frame)
            })
            .collect();
        let body = Body::random(rng, config);
        Self {
            id,
            genome,
            traits,
            frames,
            scores: HashMap::new(),
            body,
        }
    }

    /// Recompute scores for every trait that has an ideal sequence.
    ///
    /// Traits without an ideal keep no score entry. Pure function of
    /// genome, frames, and ideals, so callers may batch this in parallel.
    pub fn compute_scores(&mut self, ideals: &IdealSequences) {
        self.scores = self
            .traits
            .iter()
            .filter_map(|name| {
                let ideal = ideals.get(name)?;
                let observed = extract(&self.genome, self.frames[name.as_str()]);
                Some((name.clone(), similarity(observed, ideal)))
            })
            .collect();
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn genome(&self) -> &str {
        &self.genome
    }

    #[inline]
    pub fn genome_len(&self) -> usize {
        self.genome.len()
    }

    #[inline]
    pub fn traits(&self) -> &[String] {
        &self.traits
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Frame of a trait.
    ///
    /// # Panics
    /// Panics if the trait is not a member of this cell's trait list;
    /// that is a programming error, not a recoverable condition.
    pub fn frame(&self, trait_name: &str) -> Frame {
        self.frames[trait_name]
    }

    /// Score of a trait in `[0, 1]`.
    ///
    /// # Panics
    /// Panics if the trait is unknown or has no ideal sequence.
    pub fn score(&self, trait_name: &str) -> f64 {
        self.scores[trait_name]
    }

    /// Subsequence the trait's frame selects from the genome, clamped to
    /// genome bounds. Pure read.
    pub fn trait_sequence(&self, trait_name: &str) -> &str {
        extract(&self.genome, self.frames[trait_name])
    }

    /// Serializable record of this cell.
    pub fn to_snapshot(&self) -> CellSnapshot {
        CellSnapshot {
            id: self.id,
            genome: self.genome.clone(),
            genome_size: self.genome.len(),
            traits: self.traits.clone(),
            trait_frames: self
                .frames
                .iter()
                .map(|(name, frame)| (name.clone(), [frame.start, frame.end]))
                .collect(),
            trait_scores: self
                .scores
                .iter()
                .map(|(name, score)| (name.clone(), *score))
                .collect(),
            position: self.body.position,
            radius: self.body.radius,
            color: self.body.color.clone(),
        }
    }
}
