//! Graceful Shutdown Handling
//!
//! Listens for SIGTERM/SIGINT, fans the signal out to subscribers and bounds
//! how long the server may take to drain in-flight requests.

use crate::Result;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::signal;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Shutdown coordinator that manages the graceful shutdown process
pub struct ShutdownCoordinator {
    /// Broadcast sender for shutdown signal
    shutdown_tx: broadcast::Sender<()>,
    /// How long to wait for the server to drain
    timeout: Duration,
}

impl ShutdownCoordinator {
    /// Create a new shutdown coordinator
    pub fn new(timeout: Duration) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            shutdown_tx,
            timeout,
        }
    }

    /// Get a shutdown receiver for components to listen for shutdown signals
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Future that completes once shutdown has been triggered
    pub fn shutdown_signal(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut shutdown_rx = self.subscribe();
        async move {
            let _ = shutdown_rx.recv().await;
            debug!("Shutdown signal received by subscriber");
        }
    }

    /// Trigger shutdown without waiting for an OS signal
    pub fn trigger(&self) {
        if let Err(e) = self.shutdown_tx.send(()) {
            warn!("Failed to send shutdown signal: {}", e);
        }
    }

    /// Wait for SIGTERM/SIGINT (Ctrl+C elsewhere), then trigger shutdown
    pub async fn listen_for_signals(&self) -> Result<()> {
        info!("Starting shutdown signal listener");

        #[cfg(unix)]
        {
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
            let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())?;

            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, initiating graceful shutdown");
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT, initiating graceful shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            signal::ctrl_c().await?;
            info!("Received Ctrl+C, initiating graceful shutdown");
        }

        self.trigger();
        Ok(())
    }

    /// Wait for a server task to finish draining, aborting it after the timeout
    pub async fn drain(&self, handle: JoinHandle<Result<()>>) -> Result<()> {
        let start_time = Instant::now();
        let abort = handle.abort_handle();

        match tokio::time::timeout(self.timeout, handle).await {
            Ok(Ok(result)) => {
                info!("Server drained in {:?}", start_time.elapsed());
                result
            }
            Ok(Err(e)) if e.is_cancelled() => {
                debug!("Server task was cancelled");
                Ok(())
            }
            Ok(Err(e)) => {
                error!("Server task failed: {}", e);
                Err(anyhow::anyhow!("Server task failed: {}", e))
            }
            Err(_) => {
                warn!("Shutdown timeout reached after {:?}, aborting server", self.timeout);
                abort.abort();
                Ok(())
            }
        }
    }
}
