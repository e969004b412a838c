//! Bcrypt password hasher adapter.

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Password hasher backed by the `bcrypt` crate.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Create a hasher with the library's default cost.
    pub const fn new() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Create a hasher with an explicit cost. Tests use the minimum cost
    /// to stay fast; production keeps the default.
    pub const fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
        bcrypt::hash(plaintext, self.cost).map_err(|error| PasswordHashError::hash(error.to_string()))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, PasswordHashError> {
        bcrypt::verify(plaintext, hash).map_err(|error| PasswordHashError::verify(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_and_reject_wrong_passwords() {
        let hasher = BcryptPasswordHasher::with_cost(4);
        let hash = hasher.hash("s3cret").expect("hash succeeds");

        assert!(hasher.verify("s3cret", &hash).expect("verify succeeds"));
        assert!(!hasher.verify("wrong", &hash).expect("verify succeeds"));
    }

    #[test]
    fn malformed_hashes_surface_as_verify_errors() {
        let hasher = BcryptPasswordHasher::with_cost(4);
        let error = hasher
            .verify("s3cret", "not-a-bcrypt-hash")
            .expect_err("malformed hash");
        assert!(matches!(error, PasswordHashError::Verify { .. }));
    }
}
