//! Unreliable measurement service.
//!
//! Answers with the station's current value, but only most of the time:
//! see [`FaultProfile`] for the failure modes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::replica::outcome::{FaultProfile, Outcome};
use crate::station::Station;

const UNAVAILABLE_BODY: &str = "Service unavailable";

/// One replica's request handling.
#[derive(Debug)]
pub struct UnreliableService {
    name: String,
    station: Station,
    profile: FaultProfile,
    shutdown: Shutdown,
}

impl UnreliableService {
    pub fn new(name: impl Into<String>, station: Station, profile: FaultProfile, shutdown: Shutdown) -> Self {
        Self {
            name: name.into(),
            station,
            profile,
            shutdown,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Draw an outcome and play it out.
    pub async fn respond(&self) -> (StatusCode, String) {
        self.respond_with(self.profile.draw()).await
    }

    /// Play out a given outcome.
    pub async fn respond_with(&self, outcome: Outcome) -> (StatusCode, String) {
        tracing::debug!(replica = %self.name, ?outcome, "Serving measurement");
        metrics::record_replica_outcome(&self.name, outcome.kind().as_str());

        match outcome {
            Outcome::SlowSuccess(delay) => {
                tokio::time::sleep(delay).await;
                (StatusCode::OK, self.station.current().to_string())
            }
            Outcome::Hang(duration) => {
                let mut shutdown = self.shutdown.subscribe();
                tokio::select! {
                    _ = tokio::time::sleep(duration) => {
                        tracing::debug!(replica = %self.name, "Hang elapsed");
                    }
                    _ = shutdown.recv() => {
                        tracing::debug!(replica = %self.name, "Hang released by shutdown");
                    }
                }
                (StatusCode::SERVICE_UNAVAILABLE, UNAVAILABLE_BODY.to_string())
            }
            Outcome::Fail => (StatusCode::SERVICE_UNAVAILABLE, UNAVAILABLE_BODY.to_string()),
        }
    }
}

/// Axum handler for `GET /`.
pub async fn serve_measurement(State(service): State<Arc<UnreliableService>>) -> impl IntoResponse {
    service.respond().await
}
