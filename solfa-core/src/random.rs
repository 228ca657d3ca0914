//! Uniform random sources used for prompt selection and answer shuffling.

use std::time::{SystemTime, UNIX_EPOCH};

/// A generator of uniform values in `[0, 1)`.
///
/// Implemented for plain closures so tests can inject a fixed sequence:
///
/// ```
/// use solfa_core::random_index;
/// assert_eq!(random_index(7, &mut || 0.5), 3);
/// ```
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

impl<F: FnMut() -> f64> RandomSource for F {
    fn next_f64(&mut self) -> f64 {
        self()
    }
}

/// 64-bit linear congruential generator.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seeded from the wall clock.
    pub fn from_time() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x2545_f491_4f6c_dd1d);
        Self::new(nanos)
    }
}

impl Default for Lcg {
    fn default() -> Self {
        Self::from_time()
    }
}

impl RandomSource for Lcg {
    fn next_f64(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        // top 53 bits -> [0, 1)
        (self.state >> 11) as f64 / (1u64 << 53) as f64
    }
}
