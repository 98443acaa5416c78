//! Authentication Types

use crate::store::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;
use thiserror::Error;
use uuid::Uuid;

/// Opaque session identifier handed to clients.
///
/// Backed by a random (v4) UUID drawn from the OS RNG, so identifiers are
/// unguessable and never sequential. The nil UUID is never issued and acts as
/// the "missing" sentinel at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Draw a fresh random identifier
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The never-issued sentinel id
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for SessionId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An active login session.
///
/// Sessions are immutable once created; the store hands out clones only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    id: SessionId,
    account_id: String,
    created_at: SystemTime,
}

impl Session {
    pub(crate) fn new(id: SessionId, account_id: String) -> Self {
        Self {
            id,
            account_id,
            created_at: SystemTime::now(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }
}

/// Stored representation of a secret (an Argon2 PHC string).
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord(String);

impl CredentialRecord {
    /// Wrap a previously stored record
    pub fn from_stored(record: impl Into<String>) -> Self {
        Self(record.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Records never show up in logs.
impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialRecord(..)")
    }
}

/// Result of a login attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated(SessionId),
    /// Unknown account or wrong secret; deliberately indistinguishable.
    Rejected,
}

impl LoginOutcome {
    pub fn session_id(&self) -> Option<SessionId> {
        match self {
            LoginOutcome::Authenticated(id) => Some(*id),
            LoginOutcome::Rejected => None,
        }
    }
}

/// Errors surfaced by the session manager and credential verifier
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("secret must not be empty")]
    EmptySecret,

    #[error("account '{0}' does not exist")]
    UnknownAccount(String),

    #[error("credential hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Credential lookups the session manager needs from account storage.
///
/// Both calls may fail for reasons outside the manager's control; those
/// failures are propagated untouched.
pub trait AccountStore: Send + Sync {
    /// Stored credential for the account, or `None` when it does not exist
    fn get_credential(&self, account_id: &str) -> Result<Option<CredentialRecord>, StoreError>;

    /// Replace the account's credential; `false` when the account does not exist
    fn set_credential(&self, account_id: &str, record: CredentialRecord) -> Result<bool, StoreError>;
}
