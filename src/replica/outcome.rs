//! Fault injection profile.
//!
//! One uniform draw `x` in `[0, 1)` picks the outcome:
//! ```text
//! x < success                  → SlowSuccess (random delay, then 200)
//! success ≤ x < success + hang → Hang (sleep for the hang duration)
//! otherwise                    → Fail (503 right away)
//! ```

use std::time::Duration;

use crate::config::FaultConfig;

/// Which branch a draw falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    SlowSuccess,
    Hang,
    Fail,
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::SlowSuccess => "slow_success",
            OutcomeKind::Hang => "hang",
            OutcomeKind::Fail => "fail",
        }
    }
}

/// A fully resolved outcome for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Answer 200 after the delay.
    SlowSuccess(Duration),
    /// Do not answer for this long.
    Hang(Duration),
    /// Answer 503 immediately.
    Fail,
}

impl Outcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::SlowSuccess(_) => OutcomeKind::SlowSuccess,
            Outcome::Hang(_) => OutcomeKind::Hang,
            Outcome::Fail => OutcomeKind::Fail,
        }
    }
}

/// Probabilities and durations of the simulated failure modes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaultProfile {
    success_ratio: f64,
    hang_threshold: f64,
    max_latency: Duration,
    hang: Duration,
}

impl FaultProfile {
    pub fn new(success_ratio: f64, hang_ratio: f64, max_latency: Duration, hang: Duration) -> Self {
        Self {
            success_ratio,
            hang_threshold: success_ratio + hang_ratio,
            max_latency,
            hang,
        }
    }

    pub fn from_config(config: &FaultConfig) -> Self {
        Self::new(
            config.success_ratio,
            config.hang_ratio,
            Duration::from_millis(config.max_latency_ms),
            Duration::from_secs(config.hang_secs),
        )
    }

    /// Every request answers 200 after at most `max_latency`.
    pub fn always_succeed(max_latency: Duration) -> Self {
        Self::new(1.0, 0.0, max_latency, Duration::ZERO)
    }

    /// Every request stalls for `hang`.
    pub fn always_hang(hang: Duration) -> Self {
        Self::new(0.0, 1.0, Duration::ZERO, hang)
    }

    /// Every request answers 503.
    pub fn always_fail() -> Self {
        Self::new(0.0, 0.0, Duration::ZERO, Duration::ZERO)
    }

    pub fn hang_duration(&self) -> Duration {
        self.hang
    }

    /// Branch taken for the draw `x`.
    pub fn classify(&self, x: f64) -> OutcomeKind {
        if x < self.success_ratio {
            OutcomeKind::SlowSuccess
        } else if x < self.hang_threshold {
            OutcomeKind::Hang
        } else {
            OutcomeKind::Fail
        }
    }

    /// Draw a fresh outcome.
    pub fn draw(&self) -> Outcome {
        match self.classify(fastrand::f64()) {
            OutcomeKind::SlowSuccess => Outcome::SlowSuccess(self.random_latency()),
            OutcomeKind::Hang => Outcome::Hang(self.hang),
            OutcomeKind::Fail => Outcome::Fail,
        }
    }

    fn random_latency(&self) -> Duration {
        let max_ms = self.max_latency.as_millis() as u64;
        if max_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(fastrand::u64(..max_ms))
        }
    }
}

impl Default for FaultProfile {
    fn default() -> Self {
        Self::from_config(&FaultConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        let profile = FaultProfile::default();
        assert_eq!(profile.classify(0.0), OutcomeKind::SlowSuccess);
        assert_eq!(profile.classify(0.69), OutcomeKind::SlowSuccess);
        assert_eq!(profile.classify(0.70), OutcomeKind::Hang);
        assert_eq!(profile.classify(0.84), OutcomeKind::Hang);
        assert_eq!(profile.classify(0.85), OutcomeKind::Fail);
        assert_eq!(profile.classify(0.99), OutcomeKind::Fail);
    }

    #[test]
    fn test_draw_stays_within_profile() {
        let profile = FaultProfile::default();
        for _ in 0..1_000 {
            match profile.draw() {
                Outcome::SlowSuccess(delay) => assert!(delay < Duration::from_millis(1200)),
                Outcome::Hang(d) => assert_eq!(d, Duration::from_secs(3600)),
                Outcome::Fail => {}
            }
        }
    }

    #[test]
    fn test_draw_distribution_is_roughly_right() {
        let profile = FaultProfile::default();
        let draws = 20_000;
        let mut counts = [0usize; 3];
        for _ in 0..draws {
            let index = match profile.draw().kind() {
                OutcomeKind::SlowSuccess => 0,
                OutcomeKind::Hang => 1,
                OutcomeKind::Fail => 2,
            };
            counts[index] += 1;
        }
        let share = |n: usize| n as f64 / draws as f64;
        assert!((share(counts[0]) - 0.70).abs() < 0.03, "{:?}", counts);
        assert!((share(counts[1]) - 0.15).abs() < 0.03, "{:?}", counts);
        assert!((share(counts[2]) - 0.15).abs() < 0.03, "{:?}", counts);
    }

    #[test]
    fn test_degenerate_profiles() {
        assert_eq!(FaultProfile::always_fail().draw(), Outcome::Fail);
        assert_eq!(
            FaultProfile::always_hang(Duration::from_secs(5)).draw(),
            Outcome::Hang(Duration::from_secs(5))
        );
        assert_eq!(
            FaultProfile::always_succeed(Duration::ZERO).draw(),
            Outcome::SlowSuccess(Duration::ZERO)
        );
    }
}
