//! API Server

use super::{routes::ApiRoutes, state::AppState};
use crate::Result;
use anyhow::Context;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

/// HTTP API server
pub struct ApiServer {
    bind_addr: SocketAddr,
    app_state: AppState,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(bind_addr: SocketAddr, app_state: AppState) -> Self {
        Self {
            bind_addr,
            app_state,
        }
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests
    pub async fn start<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Starting API server on {}", self.bind_addr);

        let app = ApiRoutes::create_router(self.app_state);

        let listener = TcpListener::bind(self.bind_addr)
            .await
            .with_context(|| format!("Failed to bind API server to {}", self.bind_addr))?;

        info!("API server listening on {}", self.bind_addr);

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
        {
            error!("API server error: {}", e);
            return Err(e.into());
        }

        info!("API server stopped");
        Ok(())
    }

    /// Create a router for testing
    pub fn create_test_router(&self) -> Router {
        ApiRoutes::create_router(self.app_state.clone())
    }
}
