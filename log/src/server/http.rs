//! HTTP server implementation for the message log.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::signal;

use super::config::MessageLogServerConfig;
use super::handlers::{
    AppState, handle_get_messages, handle_healthy, handle_metrics, handle_push_message,
    handle_ready,
};
use super::metrics::Metrics;
use super::middleware::{MetricsLayer, TracingLayer};
use crate::MessageLog;

/// HTTP server for the message log service.
pub struct MessageLogServer {
    log: Arc<MessageLog>,
    config: MessageLogServerConfig,
}

impl MessageLogServer {
    /// Create a new message log server.
    pub fn new(log: Arc<MessageLog>, config: MessageLogServerConfig) -> Self {
        Self { log, config }
    }

    /// Build the router with all routes and middleware.
    pub fn router(log: Arc<MessageLog>, metrics: Arc<Metrics>) -> Router {
        let state = AppState {
            log,
            metrics: metrics.clone(),
        };

        Router::new()
            .route(
                "/messages",
                get(handle_get_messages).post(handle_push_message),
            )
            .route("/metrics", get(handle_metrics))
            .route("/-/healthy", get(handle_healthy))
            .route("/-/ready", get(handle_ready))
            .layer(TracingLayer::new())
            .layer(MetricsLayer::new(metrics))
            .with_state(state)
    }

    /// Run the HTTP server until SIGINT or SIGTERM.
    pub async fn run(self) -> std::io::Result<()> {
        let metrics = Arc::new(Metrics::new());
        let app = Self::router(self.log, metrics);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        tracing::info!("Starting message log HTTP server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shut down gracefully");
        Ok(())
    }
}

/// Listen for SIGTERM (K8s pod termination) and SIGINT (Ctrl+C).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, starting graceful shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
