//! OS signal handling.

/// Wait for Ctrl+C.
///
/// If the handler cannot be installed the error is logged and the future
/// never resolves, leaving shutdown to other triggers.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
