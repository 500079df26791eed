//! Replica race: first-answer-wins reads from redundant, unreliable replicas.

pub mod config;
pub mod dispatch;
pub mod lifecycle;
pub mod observability;
pub mod replica;
pub mod station;

pub use config::{ClientConfig, ServerConfig};
pub use dispatch::{Dispatcher, ResponseEnvelope};
pub use lifecycle::Shutdown;
pub use replica::ReplicaSet;
