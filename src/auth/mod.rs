//! Authentication Module
//!
//! Credential verification and the session lifecycle every endpoint depends on.

pub mod credential;
pub mod manager;
pub mod store;
pub mod types;

pub use credential::CredentialVerifier;
pub use manager::SessionManager;
pub use store::SessionStore;
pub use types::{AccountStore, AuthError, CredentialRecord, LoginOutcome, Session, SessionId};
