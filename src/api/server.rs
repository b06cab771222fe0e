//! Server startup and binding

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use crate::api::config::ServerConfig;
use crate::api::routes::{self, AppState};

/// Server instance that can be started
pub struct Server {
    config: Arc<ServerConfig>,
    router: Router,
}

impl Server {
    /// Create a server around the application state
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        let router = routes::build_router(state);
        Self { config, router }
    }

    /// Socket address the server will bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        self.config
            .socket_addr()
            .parse()
            .with_context(|| format!("invalid listen address {}", self.config.socket_addr()))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Bind the configured address and serve until Ctrl-C
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.socket_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        self.run_with_listener(listener).await
    }

    /// Serve on an already bound listener
    pub async fn run_with_listener(self, listener: TcpListener) -> anyhow::Result<()> {
        let addr = listener.local_addr().context("listener has no local address")?;
        tracing::info!(%addr, "server listening");
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("server error")
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
