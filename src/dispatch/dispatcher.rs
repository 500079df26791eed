//! First-success-wins request dispatcher.
//!
//! # Responsibilities
//! - Start one request per endpoint at call time
//! - Hand back the first 200 observed, or the unavailable envelope
//! - Abort every request still in flight before returning
//!
//! Outcomes are consumed in completion order from a [`JoinSet`], so for a
//! fixed completion order the winner is always the same.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::dispatch::envelope::ResponseEnvelope;
use crate::dispatch::request::{fetch_one, AttemptError, Endpoint, RequestSpec};
use crate::observability::metrics;

/// Races a request against a set of redundant endpoints.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    client: Client,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured HTTP client (proxy settings, pool limits).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Issue `spec` to every endpoint and return the first successful answer.
    ///
    /// Never waits longer than `timeout`, whatever the endpoints do.
    pub async fn dispatch(
        &self,
        spec: &RequestSpec,
        endpoints: &[Endpoint],
        timeout: Duration,
    ) -> ResponseEnvelope {
        let attempts = endpoints.iter().map(|endpoint| {
            let client = self.client.clone();
            let spec = spec.clone();
            let endpoint = endpoint.clone();
            let label = endpoint.to_string();
            let attempt = async move { fetch_one(&client, &spec, &endpoint, timeout).await };
            (label, attempt)
        });

        let span = tracing::debug_span!(
            "dispatch",
            dispatch_id = %Uuid::new_v4(),
            endpoints = endpoints.len(),
        );
        race(attempts, timeout).instrument(span).await
    }
}

/// Dispatch with a fresh default client.
pub async fn dispatch(
    spec: &RequestSpec,
    endpoints: &[Endpoint],
    timeout: Duration,
) -> ResponseEnvelope {
    Dispatcher::new().dispatch(spec, endpoints, timeout).await
}

/// Run labelled attempts concurrently until one succeeds, all fail, or the
/// deadline passes.
pub async fn race<I, F>(attempts: I, timeout: Duration) -> ResponseEnvelope
where
    I: IntoIterator<Item = (String, F)>,
    F: Future<Output = Result<String, AttemptError>> + Send + 'static,
{
    let start = Instant::now();

    let mut in_flight = JoinSet::new();
    for (label, attempt) in attempts {
        in_flight.spawn(async move { (label, attempt.await) });
    }

    // `timeout` saturates instead of overflowing for huge durations.
    let winner = tokio::time::timeout(timeout, async {
        while let Some(joined) = in_flight.join_next().await {
            match joined {
                Ok((label, Ok(body))) => return Some((label, body)),
                Ok((label, Err(e))) => {
                    tracing::debug!(endpoint = %label, error = %e, "Attempt failed");
                    metrics::record_attempt_failure(e.kind());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Attempt task did not complete");
                    metrics::record_attempt_failure("task");
                }
            }
        }
        None
    })
    .await;

    let abandoned = in_flight.len();
    in_flight.shutdown().await;

    let elapsed = start.elapsed();
    let envelope = match winner {
        Ok(Some((label, body))) => {
            tracing::debug!(endpoint = %label, ?elapsed, abandoned, "First success");
            ResponseEnvelope::success(body)
        }
        Ok(None) => {
            tracing::warn!(?elapsed, "All endpoints failed");
            ResponseEnvelope::unavailable()
        }
        Err(_) => {
            tracing::warn!(?timeout, abandoned, "No endpoint answered before the deadline");
            ResponseEnvelope::unavailable()
        }
    };

    metrics::record_dispatch(envelope.status, elapsed);
    envelope
}
