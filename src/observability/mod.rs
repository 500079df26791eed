//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Station, replicas and dispatcher produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or config)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Metric calls are no-ops until a recorder is installed
//! - Label values stay low-cardinality (replica names, outcome kinds)

pub mod logging;
pub mod metrics;
