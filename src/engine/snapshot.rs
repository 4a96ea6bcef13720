//! JSON export of per-round populations.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::schema::{CellSnapshot, RoundSnapshot};

/// Writes one JSON file per round into a target directory.
#[derive(Debug)]
pub struct SnapshotWriter {
    dir: PathBuf,
}

impl SnapshotWriter {
    /// Create a writer, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the round's survivors to `cells_round_<round>.json` and
    /// return the file path.
    pub fn write_round(&self, round: usize, cells: &[CellSnapshot]) -> io::Result<PathBuf> {
        let snapshot = RoundSnapshot::new(round, cells.iter().cloned());
        let path = self.dir.join(format!("cells_round_{round}.json"));
        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&path, json)?;
        debug!("wrote {} cells to {}", cells.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::cell::Cell;
    use crate::engine::rng::EngineRng;
    use crate::schema::SimulationConfig;

    fn sample_snapshots(n: u64) -> Vec<CellSnapshot> {
        let config = SimulationConfig::default();
        let mut rng = EngineRng::new(8);
        (0..n)
            .map(|id| Cell::random(id, config.trait_names(), &config, &mut rng).to_snapshot())
            .collect()
    }

    #[test]
    fn writes_one_file_per_round() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path()).unwrap();

        let path = writer.write_round(0, &sample_snapshots(3)).unwrap();
        assert_eq!(path.file_name().unwrap(), "cells_round_0.json");
        assert!(path.exists());

        let path = writer.write_round(1, &sample_snapshots(2)).unwrap();
        assert_eq!(path.file_name().unwrap(), "cells_round_1.json");
    }

    #[test]
    fn written_snapshot_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path()).unwrap();
        let cells = sample_snapshots(4);
        let path = writer.write_round(7, &cells).unwrap();

        let json = fs::read_to_string(path).unwrap();
        let parsed: RoundSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.round, 7);
        assert_eq!(parsed.cells.len(), 4);
        assert_eq!(parsed.cells[&0].genome, cells[0].genome);
    }

    #[test]
    fn creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("runs").join("a");
        let writer = SnapshotWriter::new(&nested).unwrap();
        assert!(nested.is_dir());
        writer.write_round(0, &[]).unwrap();
        assert!(nested.join("cells_round_0.json").exists());
    }
}
