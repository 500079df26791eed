//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig / ClientConfig (validated, immutable)
//!     → handed by value to the replica servers or the dispatcher loop
//! ```
//!
//! # Design Decisions
//! - Config is static; there is no reload path
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_client_config, load_server_config, read_client_config, ConfigError};
pub use schema::{
    ClientConfig, FaultConfig, ObservabilityConfig, ReplicaConfig, ServerConfig, StationConfig,
};
pub use validation::{validate_client_config, validate_server_config, ValidationError};
