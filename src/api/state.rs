//! Shared application state

use crate::auth::{CredentialVerifier, SessionManager};
use crate::config::Config;
use crate::metrics::Metrics;
use crate::store::MemoryStore;
use crate::Result;
use anyhow::Context;
use axum::http::HeaderName;
use std::sync::Arc;
use std::time::SystemTime;

/// State shared by every handler.
///
/// Built once at startup; the session manager is injected here and nowhere
/// else.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<SessionManager>,
    pub store: Arc<MemoryStore>,
    pub metrics: Arc<Metrics>,
    pub session_header: HeaderName,
    pub start_time: SystemTime,
}

impl AppState {
    /// Assemble state from already-built components
    pub fn new(
        config: Arc<Config>,
        sessions: Arc<SessionManager>,
        store: Arc<MemoryStore>,
        metrics: Arc<Metrics>,
    ) -> Result<Self> {
        let session_header = HeaderName::from_bytes(config.auth.session_header.as_bytes())
            .with_context(|| format!("Invalid session header: {}", config.auth.session_header))?;

        Ok(Self {
            config,
            sessions,
            store,
            metrics,
            session_header,
            start_time: SystemTime::now(),
        })
    }

    /// Build the store, verifier and session manager described by `config`
    pub fn from_config(config: Config) -> Result<Self> {
        let verifier = CredentialVerifier::new(&config.auth)
            .context("Failed to initialise credential verifier")?;
        let store = Arc::new(MemoryStore::new());
        let sessions = Arc::new(SessionManager::new(store.clone(), verifier));

        Self::new(Arc::new(config), sessions, store, Arc::new(Metrics::new()))
    }
}
