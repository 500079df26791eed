//! Fake temperature model.
//!
//! A mean-reverting random walk around the monthly average temperature in
//! Stockholm: short-term noise from a standard normal sample, pulled back
//! toward the baseline by 2% of the current deviation on every step.

use chrono::{Datelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Monthly average temperatures, January first.
pub const MONTHLY_BASELINE: [i64; 12] = [-3, -3, 0, 5, 11, 16, 17, 16, 12, 8, 3, -1];

/// Strength of the pull back toward the baseline.
const REVERSION: f64 = 0.02;

/// Produces successive plausible measurement values.
///
/// Fully initialized by its constructor; the first call to
/// [`next_value`](Self::next_value) returns the initial value.
#[derive(Debug)]
pub struct FakeSignalGenerator {
    baseline: i64,
    value: i64,
    rng: StdRng,
    samples: u64,
}

impl FakeSignalGenerator {
    /// Baseline from the current month, seeded from the current time.
    pub fn new() -> Self {
        let now = Utc::now();
        let seed = now
            .timestamp_nanos_opt()
            .map(|nanos| nanos as u64)
            .unwrap_or_else(|| now.timestamp() as u64);
        Self::seeded(now.month(), seed)
    }

    /// Deterministic generator for a calendar month (1-12) and seed.
    pub fn seeded(month: u32, seed: u64) -> Self {
        let baseline = MONTHLY_BASELINE[(month.clamp(1, 12) - 1) as usize];
        let mut rng = StdRng::seed_from_u64(seed);
        let value = baseline - 4 + rng.gen_range(0..8);
        Self {
            baseline,
            value,
            rng,
            samples: 0,
        }
    }

    pub fn baseline(&self) -> i64 {
        self.baseline
    }

    /// Number of values handed out so far.
    pub fn samples_taken(&self) -> u64 {
        self.samples
    }

    /// Next value of the walk.
    pub fn next_value(&mut self) -> i64 {
        if self.samples > 0 {
            let noise: f64 = self.rng.sample(StandardNormal);
            let pull = REVERSION * (self.value - self.baseline) as f64;
            self.value += (noise - pull).round() as i64;
        }
        self.samples += 1;
        self.value
    }
}

impl Default for FakeSignalGenerator {
    fn default() -> Self {
        Self::new()
    }
}
