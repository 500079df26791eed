//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGINT (Ctrl+C) → shutdown_signal() resolves
//!
//! Shutdown (shutdown.rs):
//!     trigger() → latched flag seen by replica servers, updater, hanging handlers
//!     → servers stop accepting and drain → process exits
//! ```
//!
//! # Design Decisions
//! - One latched flag; every long-running task subscribes
//! - Hanging handlers listen too, so draining never waits on a stall
//! - Listeners created after the trigger still see it

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownListener};
pub use signals::shutdown_signal;
