//! Simulated replica subsystem.
//!
//! # Data Flow
//! ```text
//! GET / on a replica listener
//!     → server.rs (axum router, request ID, tracing, timeout)
//!     → service.rs (draw an outcome, sleep, answer)
//!     → outcome.rs (fault profile: slow success / hang / fail)
//!     → Station::current() for the success body
//! ```
//!
//! # Design Decisions
//! - Every replica in a process reads the same station
//! - Outcomes are drawn per request, independently per replica
//! - Hanging requests are released by shutdown, even ones that start after it

pub mod outcome;
pub mod server;
pub mod service;

pub use outcome::{FaultProfile, Outcome, OutcomeKind};
pub use server::{ReplicaServer, ReplicaSet, ServerError};
pub use service::UnreliableService;
