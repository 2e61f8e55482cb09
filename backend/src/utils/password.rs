//! Password hashing and verification using bcrypt.
//!
//! Hashes carry their own random salt and cost factor, so two hashes of the
//! same password differ yet both verify.

use crate::errors::{ServiceError, ServiceResult};
use bcrypt::{DEFAULT_COST, hash, verify};

/// bcrypt hasher with a fixed cost factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Function to hash a password before storing in database
    ///
    /// # Errors
    /// Returns `ServiceError::Hashing` if bcrypt fails (bad cost, RNG failure)
    pub fn hash(&self, password: &str) -> ServiceResult<String> {
        hash(password, self.cost).map_err(|e| ServiceError::hashing(e.to_string()))
    }

    /// Checks `password` against a stored hash.
    ///
    /// A stored hash bcrypt cannot parse counts as a mismatch.
    pub fn verify(&self, password: &str, password_hash: &str) -> bool {
        match verify(password, password_hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!("Stored password hash could not be verified: {}", e);
                false
            }
        }
    }

    /// Spends the bcrypt work of a verification when there is no stored hash
    /// to compare against. Always a mismatch.
    pub fn verify_absent(&self, password: &str) -> bool {
        if let Err(e) = self.hash(password) {
            tracing::warn!("Placeholder password hash failed: {}", e);
        }
        false
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}
