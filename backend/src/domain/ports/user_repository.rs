//! Driven port for user persistence adapters.

use async_trait::async_trait;

use crate::domain::user::{ContactNumber, Email, LoginHandle, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique column already holds the supplied value.
        Duplicate { field: String } => "duplicate value for unique field {field}",
    }
}

/// Which unique signup field an existing record already occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    /// The email address is taken.
    Email,
    /// The login handle is taken.
    LoginHandle,
    /// The contact number is taken.
    ContactNumber,
}

impl DuplicateField {
    /// JSON field name reported back to the client.
    pub const fn as_field_name(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::LoginHandle => "loginHandle",
            Self::ContactNumber => "contactNumber",
        }
    }
}

/// Port abstraction over durable user storage.
///
/// `list` returns users ordered by creation time ascending; the ordering
/// is part of the port contract so callers never re-sort.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user record.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Report which unique field, if any, an existing record already uses.
    async fn find_duplicate(
        &self,
        email: &Email,
        login_handle: &LoginHandle,
        contact_number: &ContactNumber,
    ) -> Result<Option<DuplicateField>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user whose email or contact number matches `identifier`.
    async fn find_by_login_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Unconditionally mark a user verified, returning the updated record.
    async fn set_verified(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Return every user, ordered by creation time ascending.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;
}
