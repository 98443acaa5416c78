//! Credential Verifier
//!
//! Argon2id hashing and verification of account secrets.

use super::{AuthError, CredentialRecord};
use crate::config::AuthConfig;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

/// Hashes new secrets and checks submitted secrets against stored records
#[derive(Clone)]
pub struct CredentialVerifier {
    argon2: Argon2<'static>,
    decoy: CredentialRecord,
}

impl CredentialVerifier {
    /// Create a verifier with the configured Argon2 cost parameters
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let params = Params::new(
            config.argon2_memory_kib,
            config.argon2_iterations,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| AuthError::Hashing(e.to_string()))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let decoy = hash_with(&argon2, "decoy-credential")?;

        Ok(Self { argon2, decoy })
    }

    /// Produce a salted record for `secret`.
    ///
    /// Every call uses a fresh salt, so hashing the same secret twice gives
    /// two different records that both verify.
    pub fn hash(&self, secret: &str) -> Result<CredentialRecord, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::EmptySecret);
        }
        hash_with(&self.argon2, secret)
    }

    /// Check `secret` against `record`.
    ///
    /// Returns `false` for a mismatch, an empty secret or a record that does
    /// not parse. Cost parameters are read from the record itself, so records
    /// produced under older settings keep verifying.
    pub fn verify(&self, secret: &str, record: &CredentialRecord) -> bool {
        if secret.is_empty() {
            return false;
        }

        match PasswordHash::new(record.as_str()) {
            Ok(parsed) => self
                .argon2
                .verify_password(secret.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Spend the same work as a real verification and report no match.
    ///
    /// Used when the account does not exist so that lookups of unknown
    /// accounts take as long as wrong secrets.
    pub fn verify_decoy(&self, secret: &str) -> bool {
        let _ = self.verify(secret, &self.decoy);
        false
    }
}

fn hash_with(argon2: &Argon2<'static>, secret: &str) -> Result<CredentialRecord, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| CredentialRecord::from_stored(hash.to_string()))
        .map_err(|e| AuthError::Hashing(e.to_string()))
}
