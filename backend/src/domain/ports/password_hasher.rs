//! Driven port for password hashing and verification.

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hasher adapters.
    pub enum PasswordHashError {
        /// Hashing the plaintext failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// Verifying the plaintext against a stored hash failed.
        Verify { message: String } => "password verification failed: {message}",
    }
}

/// Port abstraction over salted password hashing.
///
/// Methods are synchronous: hashing cost is bounded and the call sites
/// are single-record request handlers.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError>;

    /// Check a plaintext password against a stored hash.
    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, PasswordHashError>;
}
