//! Configuration schema definitions.
//!
//! Two roots live here: [`ServerConfig`] for the process hosting the
//! replicas and [`ClientConfig`] for the polling client. All types derive
//! Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the replica server process.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// The station every replica reads its measurement from.
    pub station: StationConfig,

    /// One entry per replica listener.
    pub replicas: Vec<ReplicaConfig>,

    /// Fault injection profile shared by all replicas.
    pub faults: FaultConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            station: StationConfig::default(),
            replicas: ["8080", "8081", "8082"]
                .iter()
                .enumerate()
                .map(|(i, port)| ReplicaConfig {
                    name: format!("replica-{}", i),
                    bind_address: format!("127.0.0.1:{}", port),
                })
                .collect(),
            faults: FaultConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Measurement station configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StationConfig {
    /// Station name used in logs and metric labels.
    pub name: String,

    /// Seconds between two measurements.
    pub update_interval_secs: u64,
}

impl StationConfig {
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs)
    }
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            name: "KTH".to_string(),
            update_interval_secs: 60,
        }
    }
}

/// A single replica listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReplicaConfig {
    /// Replica identifier for logging/metrics.
    pub name: String,

    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,
}

/// Fault injection profile.
///
/// A uniform draw below `success_ratio` answers after a random delay, a draw
/// in the next `hang_ratio` stalls, anything above fails immediately.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FaultConfig {
    /// Share of requests that succeed (after a random delay).
    pub success_ratio: f64,

    /// Share of requests that never answer in practice.
    pub hang_ratio: f64,

    /// Upper bound (exclusive) of the success delay in milliseconds.
    pub max_latency_ms: u64,

    /// How long a hanging request sleeps, in seconds.
    pub hang_secs: u64,
}

impl Default for FaultConfig {
    fn default() -> Self {
        Self {
            success_ratio: 0.70,
            hang_ratio: 0.15,
            max_latency_ms: 1200,
            hang_secs: 3600,
        }
    }
}

/// Root configuration for the polling client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Replica URLs raced on every round.
    pub endpoints: Vec<String>,

    /// Overall deadline of one dispatch in milliseconds.
    pub timeout_ms: u64,

    /// Pause between two rounds in milliseconds.
    pub poll_interval_ms: u64,

    /// Path requested on every endpoint.
    pub path: String,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoints: vec![
                "http://localhost:8080".to_string(),
                "http://localhost:8081".to_string(),
                "http://localhost:8082".to_string(),
            ],
            timeout_ms: 10_000,
            poll_interval_ms: 500,
            path: "/".to_string(),
            observability: ObservabilityConfig {
                metrics_enabled: false,
                ..ObservabilityConfig::default()
            },
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
