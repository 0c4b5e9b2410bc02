//! Shared, seedable random stream.
//!
//! Every random selector of one search draws from the same stream, so a seed
//! fixes the whole sequence of generated moves.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::{Rng, SeedableRng};
use rand_distr::Distribution;
use rand_chacha::ChaCha8Rng;

/// A cloneable handle to one random stream.
///
/// Clones share the stream; draws from any clone advance it for all.
#[derive(Clone)]
pub struct WorkingRandom {
    rng: Arc<Mutex<ChaCha8Rng>>,
}

impl WorkingRandom {
    /// Creates a stream seeded with `seed`, or from the OS when `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self {
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }

    fn lock(&self) -> MutexGuard<'_, ChaCha8Rng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Uniform integer in `[0, bound)`.
    ///
    /// # Panics
    ///
    /// If `bound` is zero.
    pub fn next_index(&self, bound: usize) -> usize {
        self.lock().random_range(0..bound)
    }

    /// Uniform integer in `[low, high]`.
    pub fn next_in_inclusive(&self, low: usize, high: usize) -> usize {
        self.lock().random_range(low..=high)
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f64(&self) -> f64 {
        self.lock().random::<f64>()
    }

    pub fn next_bool(&self) -> bool {
        self.lock().random::<bool>()
    }

    /// Returns true with probability `p`.
    pub fn next_bool_with(&self, p: f64) -> bool {
        self.lock().random_bool(p.clamp(0.0, 1.0))
    }

    pub fn sample<T, D: Distribution<T>>(&self, distribution: &D) -> T {
        distribution.sample(&mut *self.lock())
    }
}

impl Default for WorkingRandom {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for WorkingRandom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkingRandom").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let a = WorkingRandom::seeded(7);
        let b = WorkingRandom::seeded(7);
        let left: Vec<usize> = (0..20).map(|_| a.next_index(100)).collect();
        let right: Vec<usize> = (0..20).map(|_| b.next_index(100)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn clones_share_the_stream() {
        let a = WorkingRandom::seeded(11);
        let b = a.clone();
        let reference = WorkingRandom::seeded(11);

        let drawn = [a.next_index(1000), b.next_index(1000)];
        let expected = [reference.next_index(1000), reference.next_index(1000)];
        assert_eq!(drawn, expected);
    }

    #[test]
    fn ranges_are_respected() {
        let random = WorkingRandom::seeded(3);
        for _ in 0..200 {
            let x = random.next_in_inclusive(2, 4);
            assert!((2..=4).contains(&x));
            let f = random.next_f64();
            assert!((0.0..1.0).contains(&f));
        }
        assert!(!random.next_bool_with(0.0));
        assert!(random.next_bool_with(1.0));
    }
}
