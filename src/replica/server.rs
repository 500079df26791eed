//! Replica HTTP servers.
//!
//! # Responsibilities
//! - Create the Axum router for one replica
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind every configured replica and start the station updater
//! - Drain all of them on shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::validation::join_errors;
use crate::config::{ReplicaConfig, ServerConfig};
use crate::config::{validate_server_config, ValidationError};
use crate::lifecycle::{Shutdown, ShutdownListener};
use crate::replica::outcome::FaultProfile;
use crate::replica::service::{serve_measurement, UnreliableService};
use crate::station::{FakeSignalGenerator, MeasurementUpdater, Station};

/// Headroom the request timeout leaves above the longest simulated hang.
const TIMEOUT_HEADROOM: Duration = Duration::from_secs(60);

/// Errors that stop a replica server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("invalid configuration: {}", join_errors(.0))]
    InvalidConfig(Vec<ValidationError>),

    #[error("replica task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// HTTP server for one replica.
pub struct ReplicaServer {
    name: String,
    router: Router,
}

impl ReplicaServer {
    /// Create a replica serving `station` with the given fault profile.
    pub fn new(name: &str, station: Station, profile: FaultProfile, shutdown: Shutdown) -> Self {
        let request_timeout = profile.hang_duration().saturating_add(TIMEOUT_HEADROOM);
        let service = Arc::new(UnreliableService::new(name, station, profile, shutdown));
        let router = Self::build_router(service, request_timeout);
        Self {
            name: name.to_string(),
            router,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(service: Arc<UnreliableService>, request_timeout: Duration) -> Router {
        Router::new()
            .route("/", get(serve_measurement))
            .with_state(service)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(request_timeout)),
            )
    }

    /// Serve on `listener` until shutdown is triggered.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownListener,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(replica = %self.name, address = %addr, "Replica server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.recv().await })
            .await?;

        tracing::info!(replica = %self.name, "Replica server stopped");
        Ok(())
    }
}

async fn bind(replica: &ReplicaConfig) -> Result<TcpListener, ServerError> {
    TcpListener::bind(&replica.bind_address)
        .await
        .map_err(|source| ServerError::Bind {
            address: replica.bind_address.clone(),
            source,
        })
}

/// Every configured replica, bound and ready to serve.
///
/// The config is validated and all listeners are bound before anything is
/// spawned, so a bad address or setting fails the whole set.
pub struct ReplicaSet {
    config: ServerConfig,
    listeners: Vec<(String, TcpListener)>,
}

impl ReplicaSet {
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        validate_server_config(&config).map_err(ServerError::InvalidConfig)?;

        let mut listeners = Vec::with_capacity(config.replicas.len());
        for replica in &config.replicas {
            listeners.push((replica.name.clone(), bind(replica).await?));
        }
        Ok(Self { config, listeners })
    }

    /// Addresses actually bound, in configuration order.
    pub fn local_addrs(&self) -> Result<Vec<SocketAddr>, ServerError> {
        self.listeners
            .iter()
            .map(|(_, listener)| listener.local_addr().map_err(ServerError::from))
            .collect()
    }

    /// Run the station updater and every replica until `shutdown` is
    /// triggered. A failing replica shuts the others down.
    pub async fn run(self, shutdown: Shutdown) -> Result<(), ServerError> {
        let (station, updater) = MeasurementUpdater::start(
            &self.config.station.name,
            FakeSignalGenerator::new(),
            self.config.station.update_interval(),
            shutdown.subscribe(),
        );

        let profile = FaultProfile::from_config(&self.config.faults);
        let mut servers = JoinSet::new();
        for (name, listener) in self.listeners {
            let server = ReplicaServer::new(&name, station.clone(), profile, shutdown.clone());
            servers.spawn(server.run(listener, shutdown.subscribe()));
        }

        let mut first_error = None;
        while let Some(joined) = servers.join_next().await {
            let result = joined.map_err(ServerError::from).and_then(|r| r);
            if let Err(e) = result {
                tracing::error!(error = %e, "Replica server failed");
                shutdown.trigger();
                first_error.get_or_insert(e);
            }
        }
        updater.await?;

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
