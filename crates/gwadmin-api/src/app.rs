//! HTTP server startup.

use std::net::SocketAddr;

use tracing::{error, info};

use gwadmin_core::error::{AppError, ErrorKind};

use crate::router::build_router;
use crate::state::AppState;

/// Bind the configured address and serve until Ctrl+C.
pub async fn serve(state: AppState) -> Result<(), AppError> {
    let addr = state.config.server.bind_address();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e))?;

    info!(address = %addr, "gwadmin server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))?;

    info!("gwadmin server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
