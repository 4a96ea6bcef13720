//! Trait fitness scoring against ideal sequences.

use std::collections::HashMap;

use crate::schema::{ConfigError, SimulationConfig};

use super::genome::random_genome;
use super::rng::EngineRng;

/// Levenshtein edit distance between two ASCII sequences.
///
/// Two-row dynamic program, O(len(a) * len(b)) time and O(len(b)) space.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Normalized similarity of an observed trait sequence to its ideal.
///
/// Returns `1 - d / len(ideal)` for edit distance `d`, floored to `0.0`
/// once `d` exceeds the ideal's length. Always in `[0, 1]`.
///
/// `ideal` must be non-empty; [`IdealSequences`] enforces that at
/// construction so the division here is safe.
pub fn similarity(observed: &str, ideal: &str) -> f64 {
    debug_assert!(!ideal.is_empty(), "ideal sequences are validated non-empty");
    let dist = levenshtein(observed, ideal);
    if dist > ideal.len() {
        0.0
    } else {
        1.0 - dist as f64 / ideal.len() as f64
    }
}

/// The run's ideal target sequences, one per scored trait.
///
/// Constant for the duration of a run. Construction rejects empty
/// sequences so scoring can never divide by zero.
#[derive(Debug, Clone)]
pub struct IdealSequences {
    seqs: HashMap<String, String>,
}

impl IdealSequences {
    /// Build from explicit trait-to-sequence pairs.
    pub fn new(seqs: HashMap<String, String>) -> Result<Self, ConfigError> {
        for (name, seq) in &seqs {
            if seq.is_empty() {
                return Err(ConfigError::EmptyIdealSequence {
                    trait_name: name.clone(),
                });
            }
        }
        Ok(Self { seqs })
    }

    /// Generate one random ideal per configured trait, sized per its
    /// `ideal_size`, drawing in configuration order.
    pub fn generate(rng: &mut EngineRng, config: &SimulationConfig) -> Result<Self, ConfigError> {
        let mut seqs = HashMap::with_capacity(config.traits.len());
        for trait_config in &config.traits {
            if trait_config.ideal_size == 0 {
                return Err(ConfigError::EmptyIdealSequence {
                    trait_name: trait_config.name.clone(),
                });
            }
            let seq = random_genome(rng, trait_config.ideal_size, config.symbols());
            seqs.insert(trait_config.name.clone(), seq);
        }
        Ok(Self { seqs })
    }

    /// Ideal sequence for a trait, if one is defined.
    pub fn get(&self, trait_name: &str) -> Option<&str> {
        self.seqs.get(trait_name).map(String::as_str)
    }

    /// Iterate over all (trait, sequence) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.seqs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levenshtein_basics() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("ACGT", ""), 4);
        assert_eq!(levenshtein("", "ACGT"), 4);
        assert_eq!(levenshtein("ACGT", "ACGT"), 0);
        assert_eq!(levenshtein("ACGT", "AGGT"), 1);
        assert_eq!(levenshtein("ACGT", "CGT"), 1);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
    }

    #[test]
    fn identical_sequences_score_one() {
        assert_eq!(similarity("ACGTACGT", "ACGTACGT"), 1.0);
    }

    #[test]
    fn score_floors_to_zero_past_cutoff() {
        // distance 8 > len(ideal) = 4
        assert_eq!(similarity("AAAAAAAA", "TTTT"), 0.0);
    }

    #[test]
    fn score_is_always_in_unit_interval() {
        let cases = [
            ("AAACCCTTTG", "AAACCCTTTGGG"),
            ("", "ACGT"),
            ("ACGTACGTACGTACGT", "AC"),
            ("T", "AAAA"),
        ];
        for (observed, ideal) in cases {
            let score = similarity(observed, ideal);
            assert!((0.0..=1.0).contains(&score), "{observed} vs {ideal}: {score}");
        }
    }

    #[test]
    fn reference_fixture_scores() {
        let genome = "AAACCCTTTGGGAAACCCTTTGGGAACCTTGGAACCTTGGACTGACTG";
        // a: frame (0, 10), ideal "AAACCCTTTGGG"
        let a = similarity(&genome[0..10], "AAACCCTTTGGG");
        assert!((a - 0.8333333333333334).abs() < 1e-12);
        // b: frame (10, 20), ideal "AACCTTGG"
        let b = similarity(&genome[10..20], "AACCTTGG");
        assert_eq!(b, 0.25);
        // c: frame (20, 30), ideal "ACTG"
        let c = similarity(&genome[20..30], "ACTG");
        assert_eq!(c, 0.0);
        // frame (0, 10) against ideal "AAAAAAAA"
        assert_eq!(similarity(&genome[0..10], "AAAAAAAA"), 0.125);
    }

    #[test]
    fn empty_ideal_is_rejected_at_construction() {
        let seqs = [("digest".to_string(), String::new())].into_iter().collect();
        assert!(matches!(
            IdealSequences::new(seqs),
            Err(ConfigError::EmptyIdealSequence { trait_name }) if trait_name == "digest"
        ));
    }

    #[test]
    fn generate_sizes_ideals_per_trait() {
        let config = SimulationConfig::default();
        let mut rng = EngineRng::new(0);
        let ideals = IdealSequences::generate(&mut rng, &config).unwrap();
        assert_eq!(ideals.get("digest").unwrap().len(), 50);
        assert_eq!(ideals.get("move").unwrap().len(), 50);
        assert_eq!(ideals.get("mutate").unwrap().len(), 15);
        assert!(ideals.get("swim").is_none());
    }

    #[test]
    fn generate_is_deterministic_per_seed() {
        let config = SimulationConfig::default();
        let a = IdealSequences::generate(&mut EngineRng::new(5), &config).unwrap();
        let b = IdealSequences::generate(&mut EngineRng::new(5), &config).unwrap();
        assert_eq!(a.get("digest"), b.get("digest"));
        assert_eq!(a.get("mutate"), b.get("mutate"));
    }
}
