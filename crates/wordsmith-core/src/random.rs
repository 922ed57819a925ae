use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of randomness for content generation and probabilistic triggers.
///
/// Exact sequences are not part of any contract; the trait exists so a
/// session can be seeded for reproducibility or scripted in tests.
pub trait RandomSource: Send {
    /// Uniform sample in `[0, 1)`.
    fn next_f32(&mut self) -> f32;

    /// `true` with probability `p`.
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "index() needs a non-empty range");
        let i = (self.next_f32() * len as f32) as usize;
        i.min(len.saturating_sub(1))
    }

    /// Uniform sample in `[lo, hi)`.
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_f32() * (hi - lo)
    }
}

/// `StdRng`-backed random source.
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Reproducible source: the same seed yields the same session content.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f32(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}
