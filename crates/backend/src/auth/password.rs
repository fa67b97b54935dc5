//! Salted, deliberately slow password hashing (bcrypt).

use super::error::AuthError;

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password with a fresh random salt.
    ///
    /// The salt and cost are embedded in the returned digest, so hashing the
    /// same password twice yields two different strings. Passwords longer
    /// than [`shared_types::MAX_PASSWORD_BYTES`] are refused rather than silently cut.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(bcrypt::non_truncating_hash(password, self.cost)?)
    }

    /// Check a password against a stored digest.
    ///
    /// Malformed digests and over-long passwords verify as `false`. bcrypt
    /// compares the recomputed hash in constant time.
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        match bcrypt::non_truncating_verify(password, digest) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!("Rejecting malformed password digest: {}", e);
                false
            }
        }
    }
}
