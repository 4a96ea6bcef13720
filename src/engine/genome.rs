//! Genome generation and trait reading frames.

use serde::{Deserialize, Serialize};

use super::rng::EngineRng;

/// Half-open index range into a genome, `start <= end` always.
///
/// Endpoints live on the integers, not on `[0, genome_len]`: frame
/// mutation drifts them out of range (including negative), and
/// extraction clamps rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub start: i64,
    pub end: i64,
}

impl Frame {
    /// Build a frame from two endpoints in either order.
    pub fn new(a: i64, b: i64) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Draw a random frame: both endpoints uniform and independent over
    /// `[0, genome_len]` inclusive, then ordered.
    pub fn random(rng: &mut EngineRng, genome_len: usize) -> Self {
        let a = rng.int_inclusive(0, genome_len as i64);
        let b = rng.int_inclusive(0, genome_len as i64);
        Self::new(a, b)
    }

    /// Clamp both endpoints into `[0, genome_len]`.
    ///
    /// This is the documented boundary behavior for out-of-range frames:
    /// the clamped range may be shorter than `end - start`, or empty.
    pub fn clamped(&self, genome_len: usize) -> (usize, usize) {
        let len = genome_len as i64;
        let start = self.start.clamp(0, len) as usize;
        let end = self.end.clamp(0, len) as usize;
        (start, end)
    }

    /// Unclamped width of the frame.
    pub fn width(&self) -> i64 {
        self.end - self.start
    }
}

/// Draw a uniformly random genome of `len` symbols from `alphabet`.
pub fn random_genome(rng: &mut EngineRng, len: usize, alphabet: &[u8]) -> String {
    let mut genome = String::with_capacity(len);
    for _ in 0..len {
        genome.push(rng.symbol(alphabet) as char);
    }
    genome
}

/// Extract the subsequence a frame selects from a genome, clamping to
/// the available length. Pure read; never fails.
pub fn extract(genome: &str, frame: Frame) -> &str {
    let (start, end) = frame.clamped(genome.len());
    &genome[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn frame_endpoints_are_ordered() {
        let frame = Frame::new(9, 3);
        assert_eq!(frame, Frame { start: 3, end: 9 });
        assert_eq!(frame.width(), 6);
    }

    #[test]
    fn random_frame_stays_in_bounds() {
        let mut rng = EngineRng::new(0);
        for _ in 0..200 {
            let frame = Frame::random(&mut rng, 10);
            assert!(frame.start <= frame.end);
            assert!((0..=10).contains(&frame.start));
            assert!((0..=10).contains(&frame.end));
        }
    }

    #[test]
    fn random_genome_uses_alphabet() {
        let mut rng = EngineRng::new(1);
        let genome = random_genome(&mut rng, 115, b"ACGT");
        assert_eq!(genome.len(), 115);
        assert!(genome.bytes().all(|b| b"ACGT".contains(&b)));
    }

    #[test]
    fn extract_clamps_out_of_range_frames() {
        let genome = "ACGTACGT";
        assert_eq!(extract(genome, Frame::new(2, 6)), "GTAC");
        assert_eq!(extract(genome, Frame::new(-3, 4)), "ACGT");
        assert_eq!(extract(genome, Frame::new(6, 40)), "GT");
        assert_eq!(extract(genome, Frame::new(20, 30)), "");
        assert_eq!(extract(genome, Frame::new(-9, -2)), "");
    }

    #[test]
    fn extract_of_full_frame_is_identity() {
        let genome = "ACGTACGT";
        assert_eq!(extract(genome, Frame::new(0, 8)), genome);
    }

    proptest! {
        // Extraction length equals max(0, end - start) clipped to genome bounds.
        #[test]
        fn extraction_length_matches_clipped_width(
            genome_len in 0usize..200,
            a in -50i64..250,
            b in -50i64..250,
        ) {
            let mut rng = EngineRng::new(99);
            let genome = random_genome(&mut rng, genome_len, b"ACGT");
            let frame = Frame::new(a, b);
            let (start, end) = frame.clamped(genome.len());
            prop_assert!(start <= end);
            prop_assert_eq!(extract(&genome, frame).len(), end - start);
            prop_assert!((end - start) as i64 <= frame.width());
        }
    }
}
