//! Generational selection: the round state machine.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::time::Instant;

use log::{debug, info, trace, warn};
use rayon::prelude::*;

use crate::schema::{CellSnapshot, ConfigError, SimulationConfig};

use super::cell::Cell;
use super::fitness::IdealSequences;
use super::mutation::mutate_all;
use super::rng::EngineRng;

/// Progress report emitted after each selection round.
#[derive(Debug, Clone)]
pub struct RoundReport {
    /// Round index (0-based).
    pub round: usize,
    /// Pass threshold applied this round.
    pub threshold: f64,
    /// Size of the ranked pool (passing parents plus passing children)
    /// before the diversity filter.
    pub pool_size: usize,
    /// Cells scored this round.
    pub evaluated: usize,
    /// Survivors admitted by the diversity filter, in rank order.
    pub survivors: Vec<CellSnapshot>,
    /// Tracked trait names, in configuration order.
    pub tracked: Vec<String>,
}

impl RoundReport {
    /// Human-readable listing: per survivor and tracked trait, the frame
    /// bounds, the score rounded to 4 decimals, and the extracted
    /// subsequence.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "round {} threshold {:.4}: {} survivors (pool {})",
            self.round,
            self.threshold,
            self.survivors.len(),
            self.pool_size,
        );
        for snap in &self.survivors {
            for name in &self.tracked {
                let [start, end] = snap.trait_frames[name];
                let score = snap.trait_scores[name];
                let genome_len = snap.genome.len() as i64;
                let lo = start.clamp(0, genome_len) as usize;
                let hi = end.clamp(0, genome_len) as usize;
                let _ = writeln!(
                    out,
                    ">cell_{} {} frame=({}, {}) score={:.4}",
                    snap.id, name, start, end, score
                );
                let _ = writeln!(out, "{}", &snap.genome[lo..hi]);
            }
        }
        out
    }
}

/// Aggregate statistics for a finished run.
#[derive(Debug, Clone)]
pub struct RunStats {
    /// Rounds executed.
    pub rounds: usize,
    /// Total cells scored across the run.
    pub total_evaluations: u64,
    /// Best sum of tracked trait scores seen in any round's survivors.
    pub best_total_score: f64,
    /// Wall-clock time.
    pub elapsed_seconds: f64,
}

/// Outcome of a full run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// Final surviving population, in rank order.
    pub survivors: Vec<CellSnapshot>,
    pub stats: RunStats,
}

/// Drives rounds of mutation and selection over a cell population.
///
/// Each round raises the pass threshold (`round / rounds`), expands
/// passing parents into mutated children, re-scores the children, ranks
/// everything by summed tracked scores, and prunes to the retention cap
/// through a genetic-diversity filter.
pub struct EvolutionEngine {
    config: SimulationConfig,
    rng: EngineRng,
    ideals: IdealSequences,
    tracked: Vec<String>,
    population: Vec<Cell>,
    round: usize,
    next_id: u64,
    total_evaluations: u64,
    best_total_score: f64,
}

impl EvolutionEngine {
    /// Create an engine, generating the run's ideal sequences from the
    /// configured trait sizes.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.random_seed.unwrap_or_else(rand::random);
        let mut rng = EngineRng::new(seed);
        let ideals = IdealSequences::generate(&mut rng, &config)?;
        Ok(Self::from_parts(config, rng, ideals))
    }

    /// Create an engine with explicit ideal sequences.
    pub fn with_ideals(
        config: SimulationConfig,
        ideals: IdealSequences,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.random_seed.unwrap_or_else(rand::random);
        Ok(Self::from_parts(config, EngineRng::new(seed), ideals))
    }

    fn from_parts(config: SimulationConfig, rng: EngineRng, ideals: IdealSequences) -> Self {
        let tracked = config.tracked_traits();
        Self {
            config,
            rng,
            ideals,
            tracked,
            population: Vec::new(),
            round: 0,
            next_id: 0,
            total_evaluations: 0,
            best_total_score: f64::NEG_INFINITY,
        }
    }

    pub fn ideals(&self) -> &IdealSequences {
        &self.ideals
    }

    pub fn population(&self) -> &[Cell] {
        &self.population
    }

    pub fn round(&self) -> usize {
        self.round
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Score cells against the run's ideals, in parallel. Scoring is a
    /// pure function per cell, so seeded runs stay reproducible: all
    /// random draws happen before this, sequentially.
    fn score_cells(&mut self, cells: &mut [Cell]) {
        let ideals = &self.ideals;
        cells
            .par_iter_mut()
            .for_each(|cell| cell.compute_scores(ideals));
        self.total_evaluations += cells.len() as u64;
    }

    /// Create and score the initial random population.
    pub fn initialize(&mut self) {
        info!(
            "creating {} initial cells",
            self.config.population.initial_cells
        );
        self.round = 0;
        let trait_names = self.config.trait_names();
        let mut cells: Vec<Cell> = (0..self.config.population.initial_cells)
            .map(|_| {
                let id = self.alloc_id();
                Cell::random(id, trait_names.clone(), &self.config, &mut self.rng)
            })
            .collect();
        self.score_cells(&mut cells);
        self.population = cells;
    }

    /// Pass condition: every tracked score strictly exceeds the threshold.
    fn passes(&self, cell: &Cell, threshold: f64) -> bool {
        self.tracked.iter().all(|name| cell.score(name) > threshold)
    }

    /// Sum of tracked trait scores, the ranking key.
    fn total_tracked(&self, cell: &Cell) -> f64 {
        self.tracked.iter().map(|name| cell.score(name)).sum()
    }

    /// Execute one selection round and advance to the next.
    ///
    /// Public so indefinite-run callers can loop forever; the threshold
    /// keeps growing linearly past the configured round count.
    pub fn step_round(&mut self) -> RoundReport {
        let threshold = self.round as f64 / self.config.population.rounds as f64;
        debug!("round {}: filtering at {:.4}", self.round, threshold);

        let parents = std::mem::take(&mut self.population);
        let n_children = self.config.population.children_per_parent;
        let trait_names = self.config.trait_names();
        let mut evaluated = 0usize;
        let mut pool: Vec<Cell> = Vec::new();

        for parent in parents {
            if !self.passes(&parent, threshold) {
                continue;
            }
            // Mutation draws stay sequential on the shared generator.
            let mut children: Vec<Cell> = (0..n_children)
                .map(|_| {
                    let bundle = mutate_all(&parent, &mut self.rng, &self.config);
                    let id = self.alloc_id();
                    Cell::from_bundle(id, trait_names.clone(), bundle, &self.config, &mut self.rng)
                })
                .collect();
            self.score_cells(&mut children);
            evaluated += children.len();

            let parent_id = parent.id();
            pool.push(parent);
            let before = pool.len();
            pool.extend(
                children
                    .into_iter()
                    .filter(|child| self.passes(child, threshold)),
            );
            trace!(
                "parent {}: {} of {} children passed",
                parent_id,
                pool.len() - before,
                n_children
            );
        }

        // Rank by summed tracked scores, descending. The sort is stable,
        // so ties keep pool order: each passing parent ahead of its own
        // passing children, parents in population order.
        pool.sort_by(|a, b| {
            self.total_tracked(b)
                .partial_cmp(&self.total_tracked(a))
                .unwrap()
        });
        let pool_size = pool.len();

        // Diversity filter: greedily admit ranked cells, rejecting any
        // whose extracted subsequence for a tracked trait exactly matches
        // one already admitted for that trait this round.
        let cap = self.config.population.retention_cap;
        let mut seen: HashMap<&str, HashSet<String>> = self
            .tracked
            .iter()
            .map(|name| (name.as_str(), HashSet::new()))
            .collect();
        let mut accepted: Vec<Cell> = Vec::with_capacity(cap.min(pool_size));
        for cell in pool {
            if accepted.len() == cap {
                break;
            }
            let duplicate = self
                .tracked
                .iter()
                .any(|name| seen[name.as_str()].contains(cell.trait_sequence(name)));
            if duplicate {
                continue;
            }
            for name in &self.tracked {
                let seq = cell.trait_sequence(name).to_string();
                if let Some(admitted) = seen.get_mut(name.as_str()) {
                    admitted.insert(seq);
                }
            }
            accepted.push(cell);
        }

        if accepted.is_empty() {
            warn!(
                "round {}: no cell passed threshold {:.4}; population is extinct",
                self.round, threshold
            );
        } else {
            let best = self.total_tracked(&accepted[0]);
            if best > self.best_total_score {
                self.best_total_score = best;
            }
            info!(
                "round {}: {} survivors of {} candidates, best total score {:.4}",
                self.round,
                accepted.len(),
                pool_size,
                best
            );
        }

        self.population = accepted;
        let report = RoundReport {
            round: self.round,
            threshold,
            pool_size,
            evaluated,
            survivors: self.population.iter().map(Cell::to_snapshot).collect(),
            tracked: self.tracked.clone(),
        };
        self.round += 1;
        report
    }

    /// Run all configured rounds, invoking the callback after each.
    pub fn run_with_callback<F>(&mut self, callback: F) -> EvolutionResult
    where
        F: Fn(&RoundReport),
    {
        let start = Instant::now();
        self.initialize();

        for _ in 0..self.config.population.rounds {
            let report = self.step_round();
            callback(&report);
        }

        EvolutionResult {
            survivors: self.population.iter().map(Cell::to_snapshot).collect(),
            stats: RunStats {
                rounds: self.round,
                total_evaluations: self.total_evaluations,
                best_total_score: self.best_total_score,
                elapsed_seconds: start.elapsed().as_secs_f64(),
            },
        }
    }

    /// Run all configured rounds without progress reporting.
    pub fn run(&mut self) -> EvolutionResult {
        self.run_with_callback(|_| {})
    }
}
