//! Polling client: races every replica each round and prints the winner.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;

use replica_race::config::{read_client_config, validate_client_config, ClientConfig, ConfigError};
use replica_race::dispatch::{fetch_raw, Dispatcher, Endpoint, RequestSpec, ResponseEnvelope};
use replica_race::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "race-client")]
#[command(about = "Poll redundant replicas, keeping the first answer", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Replica URL (repeatable); replaces the configured endpoints.
    #[arg(short, long = "endpoint")]
    endpoints: Vec<String>,

    /// Overall deadline per round in milliseconds.
    #[arg(short, long)]
    timeout_ms: Option<u64>,

    /// Query only the first endpoint instead of racing all of them.
    #[arg(long)]
    single: bool,

    /// Stop after this many rounds.
    #[arg(long)]
    rounds: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        // Validated below, once the command-line overrides are applied.
        Some(path) => read_client_config(path)?,
        None => ClientConfig::default(),
    };
    if !cli.endpoints.is_empty() {
        config.endpoints = cli.endpoints.clone();
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    validate_client_config(&config).map_err(ConfigError::Validation)?;

    logging::init(&config.observability.log_level);

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let endpoints = config
        .endpoints
        .iter()
        .map(|e| e.parse::<Endpoint>())
        .collect::<Result<Vec<_>, _>>()?;
    let spec = RequestSpec::get(config.path.clone());
    let dispatcher = Dispatcher::new();
    let client = reqwest::Client::new();

    let mut round = 0u64;
    loop {
        let before = Instant::now();
        let response = if cli.single {
            single(&client, &spec, &endpoints[0], config.timeout()).await
        } else {
            dispatcher.dispatch(&spec, &endpoints, config.timeout()).await
        };
        let elapsed = before.elapsed();

        println!("Response: {}", response);
        println!("Time: {:?}", elapsed);
        println!();

        round += 1;
        if cli.rounds.is_some_and(|limit| round >= limit) {
            break;
        }
        tokio::time::sleep(config.poll_interval()).await;
    }

    Ok(())
}

/// One request to one endpoint, reporting its status and body as received.
async fn single(
    client: &reqwest::Client,
    spec: &RequestSpec,
    endpoint: &Endpoint,
    timeout: Duration,
) -> ResponseEnvelope {
    match fetch_raw(client, spec, endpoint, timeout).await {
        Ok((status, body)) => ResponseEnvelope::answered(status.as_u16(), body),
        Err(e) => {
            tracing::warn!(endpoint = %endpoint, error = %e, "Request failed");
            ResponseEnvelope::unavailable()
        }
    }
}
