//! sessiongate
//!
//! Session-gated HTTP API backend for user accounts, images and
//! notifications. Every request is identified through a single in-process
//! [`SessionManager`] that issues, resolves and revokes login sessions.

pub mod api;
pub mod auth;
pub mod config;
pub mod metrics;
pub mod shutdown;
pub mod store;

pub use api::{ApiServer, AppState};
pub use auth::SessionManager;
pub use config::Config;
pub use shutdown::ShutdownCoordinator;
pub use store::MemoryStore;

/// Common error type for application plumbing
pub type Result<T> = anyhow::Result<T>;
