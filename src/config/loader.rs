//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{ClientConfig, ServerConfig};
use crate::config::validation::{
    join_errors, validate_client_config, validate_server_config, ValidationError,
};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// Load and validate a server configuration from a TOML file.
pub fn load_server_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServerConfig = toml::from_str(&content)?;

    validate_server_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a client configuration without validating it.
///
/// For callers that still apply overrides before calling
/// [`validate_client_config`].
pub fn read_client_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load and validate a client configuration from a TOML file.
pub fn load_client_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let config = read_client_config(path)?;

    validate_client_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_minimal_server_config() {
        let file = write_config(
            r#"
            [station]
            name = "Abisko"

            [[replicas]]
            name = "only"
            bind_address = "127.0.0.1:9000"
            "#,
        );

        let config = load_server_config(file.path()).unwrap();
        assert_eq!(config.station.name, "Abisko");
        assert_eq!(config.station.update_interval_secs, 60);
        assert_eq!(config.replicas.len(), 1);
        assert_eq!(config.faults.success_ratio, 0.70);
    }

    #[test]
    fn test_load_client_config() {
        let file = write_config(
            r#"
            endpoints = ["http://127.0.0.1:9000", "http://127.0.0.1:9001"]
            timeout_ms = 2000
            "#,
        );

        let config = load_client_config(file.path()).unwrap();
        assert_eq!(config.endpoints.len(), 2);
        assert_eq!(config.timeout().as_secs(), 2);
        assert_eq!(config.poll_interval_ms, 500);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let file = write_config("timeout_ms = 0\nendpoints = []\n");
        match load_client_config(file.path()) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }

        let file = write_config("timeout_ms = \"soon\"");
        assert!(matches!(load_client_config(file.path()), Err(ConfigError::Parse(_))));

        let missing = Path::new("/definitely/not/here.toml");
        assert!(matches!(load_server_config(missing), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_read_client_config_defers_validation() {
        let file = write_config("endpoints = []\n");

        let mut config = read_client_config(file.path()).unwrap();
        assert!(config.endpoints.is_empty());
        assert!(load_client_config(file.path()).is_err());

        config.endpoints.push("http://127.0.0.1:9000".into());
        assert_eq!(validate_client_config(&config), Ok(()));
    }
}
