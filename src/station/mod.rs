//! Measurement station subsystem.
//!
//! # Data Flow
//! ```text
//! signal.rs (FakeSignalGenerator, owned by the updater)
//!     → updater.rs (one periodic task, the only writer)
//!     → measurement.rs (SharedMeasurement behind a reader/writer lock)
//!     → read by every replica request handler
//! ```
//!
//! # Design Decisions
//! - One station object per server process, no globals
//! - First measurement is taken synchronously at construction
//! - The updater stops once shutdown is triggered

pub mod measurement;
pub mod signal;
pub mod updater;

use std::sync::Arc;

pub use measurement::{Measurement, SharedMeasurement};
pub use signal::FakeSignalGenerator;
pub use updater::MeasurementUpdater;

use crate::observability::metrics;

/// A named station whose current measurement can be read concurrently.
#[derive(Debug, Clone)]
pub struct Station {
    name: Arc<str>,
    measurement: SharedMeasurement,
}

impl Station {
    /// Create a station and take its first measurement right away.
    pub fn new(name: impl Into<Arc<str>>, generator: &mut FakeSignalGenerator) -> Self {
        let name = name.into();
        let first = generator.next_value();
        let station = Self {
            name,
            measurement: SharedMeasurement::new(first),
        };
        station.report(first);
        station
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Latest measured value.
    pub fn current(&self) -> i64 {
        self.measurement.read().value
    }

    /// Latest measurement including its sequence number.
    pub fn snapshot(&self) -> Measurement {
        self.measurement.read()
    }

    /// Sample the generator and publish the result.
    pub fn take_measurement(&self, generator: &mut FakeSignalGenerator) -> i64 {
        let value = generator.next_value();
        self.measurement.record(value);
        self.report(value);
        value
    }

    fn report(&self, value: i64) {
        tracing::info!(station = %self.name, value, "{}˚C at {}", value, self.name);
        metrics::record_measurement(&self.name, value);
    }
}
