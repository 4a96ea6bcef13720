//! Serializable snapshot records for cells and rounds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Full serializable record of a single cell.
///
/// Field set mirrors what the reporting and rendering layers consume:
/// genetic state (genome, frames, scores) plus the render-facing body
/// attributes, which never feed back into the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellSnapshot {
    /// Unique identifier assigned at creation.
    pub id: u64,
    /// Full genome sequence.
    pub genome: String,
    /// Genome length at snapshot time.
    pub genome_size: usize,
    /// Ordered trait list.
    pub traits: Vec<String>,
    /// Trait name to `[start, end]` frame.
    pub trait_frames: BTreeMap<String, [i64; 2]>,
    /// Trait name to score in `[0, 1]`; only traits with an ideal
    /// sequence appear here.
    pub trait_scores: BTreeMap<String, f64>,
    /// 2-D position (render-facing).
    pub position: [f64; 2],
    /// Radius (render-facing).
    pub radius: f64,
    /// Hex color `#RRGGBB` (render-facing).
    pub color: String,
}

/// All surviving cells of one round, keyed by cell id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub round: usize,
    pub cells: BTreeMap<u64, CellSnapshot>,
}

impl RoundSnapshot {
    /// Build a round snapshot from per-cell records.
    pub fn new(round: usize, cells: impl IntoIterator<Item = CellSnapshot>) -> Self {
        Self {
            round,
            cells: cells.into_iter().map(|c| (c.id, c)).collect(),
        }
    }
}
