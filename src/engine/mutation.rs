//! Probabilistic mutation operators for genomes and frames.
//!
//! Mutation intensity is the parent's own `mutate` trait score, read off
//! the cell being mutated. A cell that evolves a better `mutate` trait
//! mutates less, which puts second-order selection pressure on
//! mutability itself. The rate is deliberately not a config knob.

use std::collections::HashMap;

use crate::schema::{SimulationConfig, MUTATE_TRAIT};

use super::cell::Cell;
use super::genome::Frame;
use super::rng::EngineRng;

/// Outcome of a single per-symbol mutation draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Replace the symbol with a different one.
    Substitution,
    /// Keep the symbol and append one random symbol after it.
    Insertion,
    /// Drop the symbol.
    Deletion,
}

/// Everything needed to construct a child cell sharing the parent's
/// trait list and the run's ideal sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationBundle {
    pub genome: String,
    pub frames: HashMap<String, Frame>,
}

/// Draw whether a mutation occurs at the given rate and, if so, which
/// kind. Insertion and deletion each take `indel_threshold / 2` of the
/// kind draw; substitution dominates the rest.
fn draw_mutation(rng: &mut EngineRng, threshold: f64, indel_threshold: f64) -> Option<MutationKind> {
    if rng.uniform() >= threshold {
        return None;
    }
    let kind = rng.uniform();
    if kind < indel_threshold / 2.0 {
        Some(MutationKind::Insertion)
    } else if kind < indel_threshold {
        Some(MutationKind::Deletion)
    } else {
        Some(MutationKind::Substitution)
    }
}

/// Uniform draw of a symbol *different* from the current one.
fn substitute(rng: &mut EngineRng, alphabet: &[u8], current: u8) -> u8 {
    let pool: Vec<u8> = alphabet.iter().copied().filter(|&b| b != current).collect();
    rng.symbol(&pool)
}

/// Produce a mutated copy of the cell's genome.
///
/// Walks every symbol position in order; the output is the concatenation
/// of per-position outcomes, so its length may differ from the parent's.
/// The parent is untouched.
pub fn mutate_genome(cell: &Cell, rng: &mut EngineRng, config: &SimulationConfig) -> String {
    let threshold = cell.score(MUTATE_TRAIT);
    let alphabet = config.symbols();
    let mut mutated = String::with_capacity(cell.genome_len() + 8);
    for &symbol in cell.genome().as_bytes() {
        match draw_mutation(rng, threshold, config.indel_threshold) {
            None => mutated.push(symbol as char),
            Some(MutationKind::Substitution) => {
                mutated.push(substitute(rng, alphabet, symbol) as char);
            }
            Some(MutationKind::Insertion) => {
                mutated.push(symbol as char);
                mutated.push(rng.symbol(alphabet) as char);
            }
            Some(MutationKind::Deletion) => {}
        }
    }
    mutated
}

/// Mutate one frame endpoint: with probability `threshold`, add a
/// `Normal(0, threshold * frame_std_max)` delta rounded to the nearest
/// integer.
fn mutate_endpoint(
    value: i64,
    threshold: f64,
    rng: &mut EngineRng,
    config: &SimulationConfig,
) -> i64 {
    if rng.uniform() < threshold {
        let delta = rng.gaussian(threshold * config.frame_std_max());
        value + delta.round() as i64
    } else {
        value
    }
}

/// Produce a mutated copy of a trait's frame.
///
/// Each endpoint is perturbed independently; the result re-sorts the
/// endpoints so `start <= end` holds. Endpoints may drift outside the
/// genome; extraction clamps.
pub fn mutate_frame(
    cell: &Cell,
    trait_name: &str,
    rng: &mut EngineRng,
    config: &SimulationConfig,
) -> Frame {
    let threshold = cell.score(MUTATE_TRAIT);
    let frame = cell.frame(trait_name);
    let start = mutate_endpoint(frame.start, threshold, rng, config);
    let end = mutate_endpoint(frame.end, threshold, rng, config);
    Frame::new(start, end)
}

/// Mutate the genome once and every trait's frame independently,
/// returning a bundle sufficient to construct a child cell.
pub fn mutate_all(cell: &Cell, rng: &mut EngineRng, config: &SimulationConfig) -> MutationBundle {
    let genome = mutate_genome(cell, rng, config);
    let frames = cell
        .traits()
        .iter()
        .map(|name| (name.clone(), mutate_frame(cell, name, rng, config)))
        .collect();
    MutationBundle { genome, frames }
}
