//! HTTP surface over a single [`agent_core::AgentOrchestrator`].

mod router;
mod state;

pub use router::{build_router, ApiError};
pub use state::{ServeHealth, ServeHealthSnapshot, ServeState};

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Bind `addr` and serve until ctrl-c, then shut the orchestrator down.
pub async fn serve(state: ServeState, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    let local = listener.local_addr().context("Failed to read bound address")?;

    state.health.mark_live();
    info!(address = %local, "WebPilot API listening");

    let orchestrator = state.orchestrator.clone();
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Shutting down orchestrator");
    orchestrator.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
