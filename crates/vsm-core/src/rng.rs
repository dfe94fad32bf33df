//! Deterministic PRNG for process timing noise.
//!
//! Uses the SplitMix64 algorithm: fast, 8 bytes of state, excellent
//! statistical properties, and trivially serializable. Normal samples are
//! drawn with the Box-Muller transform.

use std::f64::consts::TAU;

/// SplitMix64 pseudo-random number generator.
///
/// Deterministic across platforms: the same seed always yields the same
/// sequence of durations.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SimRng {
    state: u64,
}

impl SimRng {
    /// Create a new RNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform sample in `[0, 1)` with 53 bits of precision.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Sample from a normal distribution.
    ///
    /// A zero `stddev` returns `mean` exactly without advancing the state.
    pub fn normal(&mut self, mean: f64, stddev: f64) -> f64 {
        if stddev == 0.0 {
            return mean;
        }
        // 1 - [0, 1) is (0, 1], keeping ln() finite.
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
        mean + stddev * z
    }

    /// Get the internal state.
    pub fn state(&self) -> u64 {
        self.state
    }
}
