//! Periodic measurement updates.
//!
//! # Responsibilities
//! - Own the signal generator (the only caller of it)
//! - Take one measurement per interval
//! - Exit promptly once shutdown is triggered

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;

use crate::lifecycle::ShutdownListener;
use crate::station::{FakeSignalGenerator, Station};

/// Shortest period `tokio::time::interval` accepts without panicking.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Background writer for a [`Station`].
pub struct MeasurementUpdater {
    station: Station,
    generator: FakeSignalGenerator,
    interval: Duration,
}

impl MeasurementUpdater {
    pub fn new(station: Station, generator: FakeSignalGenerator, interval: Duration) -> Self {
        Self {
            station,
            generator,
            interval,
        }
    }

    /// Create a station, take its first measurement and spawn its updater.
    pub fn start(
        name: &str,
        mut generator: FakeSignalGenerator,
        interval: Duration,
        shutdown: ShutdownListener,
    ) -> (Station, JoinHandle<()>) {
        let station = Station::new(name, &mut generator);
        let updater = Self::new(station.clone(), generator, interval);
        let handle = tokio::spawn(updater.run(shutdown));
        (station, handle)
    }

    /// Update the station every interval until shutdown.
    pub async fn run(mut self, mut shutdown: ShutdownListener) {
        tracing::info!(
            station = %self.station.name(),
            interval_secs = self.interval.as_secs(),
            "Measurement updater starting"
        );

        let mut ticker = time::interval(self.interval.max(MIN_INTERVAL));
        // The first tick fires immediately; the station already has a value.
        ticker.tick().await;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.recv() => {
                    tracing::info!(station = %self.station.name(), "Measurement updater shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.station.take_measurement(&mut self.generator);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Shutdown;

    #[tokio::test(start_paused = true)]
    async fn test_updates_on_interval() {
        let shutdown = Shutdown::new();
        let (station, handle) = MeasurementUpdater::start(
            "KTH",
            FakeSignalGenerator::seeded(5, 11),
            Duration::from_secs(60),
            shutdown.subscribe(),
        );
        assert_eq!(station.snapshot().sequence, 0);

        time::sleep(Duration::from_secs(59)).await;
        assert_eq!(station.snapshot().sequence, 0);

        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(station.snapshot().sequence, 1);

        time::sleep(Duration::from_secs(120)).await;
        assert_eq!(station.snapshot().sequence, 3);

        shutdown.trigger();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_on_shutdown() {
        let shutdown = Shutdown::new();
        let (station, handle) = MeasurementUpdater::start(
            "KTH",
            FakeSignalGenerator::seeded(5, 11),
            Duration::from_secs(1),
            shutdown.subscribe(),
        );

        time::sleep(Duration::from_millis(1500)).await;
        shutdown.trigger();
        handle.await.unwrap();

        let stopped_at = station.snapshot().sequence;
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(station.snapshot().sequence, stopped_at);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_does_not_panic() {
        let shutdown = Shutdown::new();
        let (station, handle) = MeasurementUpdater::start(
            "KTH",
            FakeSignalGenerator::seeded(5, 11),
            Duration::ZERO,
            shutdown.subscribe(),
        );

        time::sleep(Duration::from_millis(5)).await;
        shutdown.trigger();
        handle.await.unwrap();
        assert!(station.snapshot().sequence > 0);
    }
}
