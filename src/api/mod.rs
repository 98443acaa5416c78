//! HTTP API Module
//!
//! Translates HTTP requests into session manager and data store calls.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod session;
pub mod state;
pub mod types;

pub use error::ApiError;
pub use routes::ApiRoutes;
pub use server::ApiServer;
pub use session::{CurrentSession, SessionHeader};
pub use state::AppState;
pub use types::*;
