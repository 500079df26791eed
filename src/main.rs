//! Unreliable weather station replicas.
//!
//! Runs several independent HTTP servers (by default on
//! `127.0.0.1:8080`, `:8081` and `:8082`). Each answers `GET /` with the
//! current (fake) temperature at the station, but only most of the time:
//!
//! ```text
//!   70%  answer 200 after up to 1.2 s
//!   15%  stall for an hour
//!   15%  answer 503 Service unavailable
//! ```
//!
//! The temperature is re-measured every minute by a single background task.

use std::path::PathBuf;

use clap::Parser;

use replica_race::config::{load_server_config, ServerConfig};
use replica_race::lifecycle::{shutdown_signal, Shutdown};
use replica_race::observability::{logging, metrics};
use replica_race::replica::ReplicaSet;

#[derive(Parser)]
#[command(name = "replica-race")]
#[command(about = "Run a set of unreliable measurement replicas", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_server_config(path)?,
        None => ServerConfig::default(),
    };

    logging::init(&config.observability.log_level);

    tracing::info!(
        station = %config.station.name,
        replicas = config.replicas.len(),
        update_interval_secs = config.station.update_interval_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let replicas = ReplicaSet::bind(config).await?;
    for addr in replicas.local_addrs()? {
        tracing::info!(address = %addr, "Listening for connections");
    }

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        trigger.trigger();
    });

    replicas.run(shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
