//! Fan-out request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! dispatch(spec, endpoints, timeout)
//!     → request.rs (one fetch_one task per endpoint, each bounded by timeout)
//!     → dispatcher.rs (completion set, first 200 wins, stragglers aborted)
//!     → envelope.rs (ResponseEnvelope: success or 503 unavailable)
//! ```
//!
//! # Design Decisions
//! - Per-endpoint errors never escape; only the aggregate envelope does
//! - Losing requests are aborted, which drops their connections and timers
//! - The deadline covers the whole race, not each attempt separately

pub mod dispatcher;
pub mod envelope;
pub mod request;

pub use dispatcher::{dispatch, Dispatcher};
pub use envelope::ResponseEnvelope;
pub use request::{fetch_one, fetch_raw, AttemptError, Endpoint, EndpointError, RequestSpec};
