//! Randomness used by random-mode arpeggios

/// A source of uniformly distributed indices
pub trait Entropy {
    /// Return a value in `0..bound`; `bound` is never zero
    fn next_index(&mut self, bound: usize) -> usize;
}

impl Entropy for fastrand::Rng {
    fn next_index(&mut self, bound: usize) -> usize {
        self.usize(..bound)
    }
}

/// Create the default generator, seeded when a seed is given
pub fn seeded(seed: Option<u64>) -> fastrand::Rng {
    match seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    }
}
