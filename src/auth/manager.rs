//! Session Manager
//!
//! The only surface request handlers use to establish and resolve identity.

use super::{
    AccountStore, AuthError, CredentialVerifier, LoginOutcome, Session, SessionId, SessionStore,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Issues, resolves and revokes login sessions
pub struct SessionManager {
    sessions: SessionStore,
    accounts: Arc<dyn AccountStore>,
    verifier: CredentialVerifier,
}

impl SessionManager {
    /// Create a session manager over the given account storage
    pub fn new(accounts: Arc<dyn AccountStore>, verifier: CredentialVerifier) -> Self {
        Self {
            sessions: SessionStore::new(),
            accounts,
            verifier,
        }
    }

    /// Log in with an account id and secret.
    ///
    /// Unknown accounts and wrong secrets both come back as
    /// [`LoginOutcome::Rejected`]. Storage failures are returned as errors.
    ///
    /// CPU-bound: runs one Argon2 verification on the calling thread and
    /// performs no I/O.
    pub fn log_in(&self, account_id: &str, secret: &str) -> Result<LoginOutcome, AuthError> {
        if !self.check_credential(account_id, secret)? {
            warn!("Rejected login for account '{}'", account_id);
            return Ok(LoginOutcome::Rejected);
        }

        let session = self.sessions.create(account_id);
        info!("Account '{}' logged in", account_id);
        Ok(LoginOutcome::Authenticated(session.id()))
    }

    /// Check a secret against the account's stored credential
    pub fn check_credential(&self, account_id: &str, secret: &str) -> Result<bool, AuthError> {
        match self.accounts.get_credential(account_id)? {
            Some(record) => Ok(self.verifier.verify(secret, &record)),
            None => {
                debug!("Credential check for unknown account '{}'", account_id);
                Ok(self.verifier.verify_decoy(secret))
            }
        }
    }

    /// Resolve a session id; nil and never-issued ids are simply absent
    pub fn find_session(&self, id: &SessionId) -> Option<Session> {
        let session = self.sessions.find(id);
        if session.is_none() {
            debug!("No active session for id {}", id);
        }
        session
    }

    /// End one session; returns whether anything was ended
    pub fn log_out(&self, id: &SessionId) -> bool {
        let removed = self.sessions.remove(id);
        if removed {
            info!("Session {} logged out", id);
        }
        removed
    }

    /// End every session of an account; returns how many were ended
    pub fn log_out_all(&self, account_id: &str) -> usize {
        let count = self.sessions.remove_all_for_account(account_id);
        info!("Logged out {} session(s) for account '{}'", count, account_id);
        count
    }

    /// Store a new credential for the account.
    ///
    /// Existing sessions of the account stay valid: changing a password does
    /// not force a re-login elsewhere. Use [`log_out_all`](Self::log_out_all)
    /// explicitly when that is wanted.
    pub fn update_credential(&self, account_id: &str, new_secret: &str) -> Result<(), AuthError> {
        let record = self.verifier.hash(new_secret)?;
        if !self.accounts.set_credential(account_id, record)? {
            return Err(AuthError::UnknownAccount(account_id.to_string()));
        }

        info!("Credential updated for account '{}'", account_id);
        Ok(())
    }

    /// Active sessions of an account, oldest first
    pub fn sessions_for_account(&self, account_id: &str) -> Vec<Session> {
        self.sessions.sessions_for_account(account_id)
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.active_count()
    }

    /// Verifier used for hashing credentials of new accounts
    pub fn verifier(&self) -> &CredentialVerifier {
        &self.verifier
    }

    /// Whether both session indexes agree on membership
    pub fn is_consistent(&self) -> bool {
        self.sessions.is_consistent()
    }

    pub(crate) fn store(&self) -> &SessionStore {
        &self.sessions
    }
}
