//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (ratios, intervals, timeouts)
//! - Check addresses and URLs parse
//! - Detect replicas sharing a bind address
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Config → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{ClientConfig, FaultConfig, ServerConfig};
use crate::dispatch::Endpoint;

/// Longest accepted simulated hang (one day).
pub const MAX_HANG_SECS: u64 = 86_400;

/// Longest accepted success delay (ten minutes).
pub const MAX_LATENCY_MS: u64 = 600_000;

/// A single semantic problem found in a config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no replicas configured")]
    NoReplicas,

    #[error("replica {name}: invalid bind address {address:?}")]
    InvalidBindAddress { name: String, address: String },

    #[error("bind address {0} used by more than one replica")]
    DuplicateBindAddress(String),

    #[error("no endpoints configured")]
    NoEndpoints,

    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("{field} must lie in [0, 1]")]
    RatioOutOfRange { field: &'static str },

    #[error("success_ratio + hang_ratio must not exceed 1")]
    RatiosExceedOne,

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} must not exceed {max}")]
    TooLarge { field: &'static str, max: u64 },

    #[error("invalid metrics address {0:?}")]
    InvalidMetricsAddress(String),
}

pub(crate) fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate a server config.
pub fn validate_server_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.replicas.is_empty() {
        errors.push(ValidationError::NoReplicas);
    }

    let mut seen = HashSet::new();
    for replica in &config.replicas {
        match replica.bind_address.parse::<SocketAddr>() {
            Ok(addr) => {
                // Port 0 asks the OS for a fresh port, so it never collides.
                if addr.port() != 0 && !seen.insert(addr) {
                    errors.push(ValidationError::DuplicateBindAddress(addr.to_string()));
                }
            }
            Err(_) => errors.push(ValidationError::InvalidBindAddress {
                name: replica.name.clone(),
                address: replica.bind_address.clone(),
            }),
        }
    }

    if config.station.update_interval_secs == 0 {
        errors.push(ValidationError::Zero { field: "station.update_interval_secs" });
    }

    validate_faults(&config.faults, &mut errors);

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_faults(faults: &FaultConfig, errors: &mut Vec<ValidationError>) {
    let mut ratios_ok = true;
    for (field, ratio) in [
        ("faults.success_ratio", faults.success_ratio),
        ("faults.hang_ratio", faults.hang_ratio),
    ] {
        if !(0.0..=1.0).contains(&ratio) {
            errors.push(ValidationError::RatioOutOfRange { field });
            ratios_ok = false;
        }
    }
    if ratios_ok && faults.success_ratio + faults.hang_ratio > 1.0 {
        errors.push(ValidationError::RatiosExceedOne);
    }
    if faults.hang_secs > MAX_HANG_SECS {
        errors.push(ValidationError::TooLarge {
            field: "faults.hang_secs",
            max: MAX_HANG_SECS,
        });
    }
    if faults.max_latency_ms > MAX_LATENCY_MS {
        errors.push(ValidationError::TooLarge {
            field: "faults.max_latency_ms",
            max: MAX_LATENCY_MS,
        });
    }
}

/// Validate a client config.
pub fn validate_client_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.endpoints.is_empty() {
        errors.push(ValidationError::NoEndpoints);
    }
    for endpoint in &config.endpoints {
        if let Err(e) = endpoint.parse::<Endpoint>() {
            errors.push(ValidationError::InvalidEndpoint {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            });
        }
    }
    if config.timeout_ms == 0 {
        errors.push(ValidationError::Zero { field: "timeout_ms" });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
