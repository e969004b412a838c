//! User identity aggregate.
//!
//! A user is created at self-registration and starts unverified. An
//! administrator flips `verified` exactly once; there is no path back to
//! unverified. The aggregate keeps the password hash private so it can
//! never leak through outward serialisation; adapters expose a
//! [`UserProfile`] view instead.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors raised by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The identifier string was empty.
    EmptyId,
    /// The identifier string was not a well-formed UUID.
    InvalidId,
    /// The email was blank.
    EmptyEmail,
    /// The email did not look like an address.
    InvalidEmail,
    /// The login handle was blank.
    EmptyLoginHandle,
    /// The contact number was not exactly ten ASCII digits.
    InvalidContactNumber,
    /// The gender string was not one of the accepted values.
    UnknownGender,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyLoginHandle => write!(f, "login handle must not be empty"),
            Self::InvalidContactNumber => {
                write!(f, "contact number must be a valid 10-digit number")
            }
            Self::UnknownGender => write!(f, "gender must be Female, Male, or Other"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an already-parsed UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unique email address used as a login identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        let trimmed = email.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        // A full RFC 5322 parser buys nothing here; the address is only a
        // lookup key and a delivery hint for out-of-band contact.
        if !trimmed.contains('@') {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unique opaque handle chosen by the user at signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoginHandle(String);

impl LoginHandle {
    /// Validate and construct a [`LoginHandle`].
    pub fn new(handle: impl Into<String>) -> Result<Self, UserValidationError> {
        let handle = handle.into();
        let trimmed = handle.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyLoginHandle);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for LoginHandle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for LoginHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<LoginHandle> for String {
    fn from(value: LoginHandle) -> Self {
        value.0
    }
}

impl TryFrom<String> for LoginHandle {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Ten-digit contact number, also usable as a login identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContactNumber(String);

impl ContactNumber {
    /// Validate and construct a [`ContactNumber`].
    pub fn new(number: impl Into<String>) -> Result<Self, UserValidationError> {
        let number = number.into();
        let trimmed = number.trim();
        if trimmed.len() != 10 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(UserValidationError::InvalidContactNumber);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ContactNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ContactNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ContactNumber> for String {
    fn from(value: ContactNumber) -> Self {
        value.0
    }
}

impl TryFrom<String> for ContactNumber {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Closed gender enumeration shared by users and applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Gender {
    /// Female.
    Female,
    /// Male.
    Male,
    /// Any other or undisclosed gender.
    Other,
}

impl Gender {
    /// Parse a gender from its display form.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        match raw.trim() {
            "Female" => Ok(Self::Female),
            "Male" => Ok(Self::Male),
            "Other" => Ok(Self::Other),
            _ => Err(UserValidationError::UnknownGender),
        }
    }

    /// Stable storage form of the gender.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Female => "Female",
            Self::Male => "Male",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bcrypt password hash. Never serialised outward; `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an already-computed hash string.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// The stored hash string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Registered portal user.
///
/// ## Invariants
/// - `email`, `login_handle`, and `contact_number` are globally unique
///   (enforced by storage).
/// - `verified` starts false and only ever moves to true.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    first_name: String,
    middle_name: Option<String>,
    last_name: String,
    login_handle: LoginHandle,
    email: Email,
    contact_number: ContactNumber,
    age: i32,
    gender: Gender,
    password_hash: PasswordHash,
    verified: bool,
    created_at: DateTime<Utc>,
}

/// Validated component bundle for creating a [`User`].
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Required first name, already trimmed and non-empty.
    pub first_name: String,
    /// Optional middle name.
    pub middle_name: Option<String>,
    /// Required last name, already trimmed and non-empty.
    pub last_name: String,
    /// Unique login handle.
    pub login_handle: LoginHandle,
    /// Unique email address.
    pub email: Email,
    /// Unique ten-digit contact number.
    pub contact_number: ContactNumber,
    /// Age in years, strictly positive.
    pub age: i32,
    /// Gender.
    pub gender: Gender,
    /// Hash of the chosen password.
    pub password_hash: PasswordHash,
}

impl User {
    /// Create a fresh, unverified user record.
    pub fn create(parts: NewUser, created_at: DateTime<Utc>) -> Self {
        Self {
            id: UserId::random(),
            first_name: parts.first_name,
            middle_name: parts.middle_name,
            last_name: parts.last_name,
            login_handle: parts.login_handle,
            email: parts.email,
            contact_number: parts.contact_number,
            age: parts.age,
            gender: parts.gender,
            password_hash: parts.password_hash,
            verified: false,
            created_at,
        }
    }

    /// Rehydrate a user from storage without re-running creation defaults.
    pub fn restore(
        id: UserId,
        parts: NewUser,
        verified: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            first_name: parts.first_name,
            middle_name: parts.middle_name,
            last_name: parts.last_name,
            login_handle: parts.login_handle,
            email: parts.email,
            contact_number: parts.contact_number,
            age: parts.age,
            gender: parts.gender,
            password_hash: parts.password_hash,
            verified,
            created_at,
        }
    }

    /// Stable identifier.
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// First name.
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Optional middle name.
    pub fn middle_name(&self) -> Option<&str> {
        self.middle_name.as_deref()
    }

    /// Last name.
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// Login handle.
    pub const fn login_handle(&self) -> &LoginHandle {
        &self.login_handle
    }

    /// Email address.
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Contact number.
    pub const fn contact_number(&self) -> &ContactNumber {
        &self.contact_number
    }

    /// Age in years.
    pub const fn age(&self) -> i32 {
        self.age
    }

    /// Gender.
    pub const fn gender(&self) -> Gender {
        self.gender
    }

    /// Stored password hash.
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Whether an administrator has verified this account.
    pub const fn verified(&self) -> bool {
        self.verified
    }

    /// Creation timestamp.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Mark the account verified. Idempotent by construction.
    pub fn mark_verified(&mut self) {
        self.verified = true;
    }

    /// Outward view of the user with the password hash stripped.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            first_name: self.first_name.clone(),
            middle_name: self.middle_name.clone(),
            last_name: self.last_name.clone(),
            login_handle: self.login_handle.clone(),
            email: self.email.clone(),
            contact_number: self.contact_number.clone(),
            age: self.age,
            gender: self.gender,
            verified: self.verified,
            created_at: self.created_at,
        }
    }
}

/// Password-stripped user view returned by every outward-facing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Stable identifier.
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    /// First name.
    pub first_name: String,
    /// Optional middle name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    /// Last name.
    pub last_name: String,
    /// Login handle.
    #[schema(value_type = String)]
    pub login_handle: LoginHandle,
    /// Email address.
    #[schema(value_type = String, example = "asha@example.org")]
    pub email: Email,
    /// Contact number.
    #[schema(value_type = String, example = "9000000000")]
    pub contact_number: ContactNumber,
    /// Age in years.
    pub age: i32,
    /// Gender.
    pub gender: Gender,
    /// Whether an administrator has verified the account.
    pub verified: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample_new_user() -> NewUser {
        NewUser {
            first_name: "Asha".to_owned(),
            middle_name: None,
            last_name: "Roy".to_owned(),
            login_handle: LoginHandle::new("asha.roy").expect("handle"),
            email: Email::new("asha@example.org").expect("email"),
            contact_number: ContactNumber::new("9000000000").expect("contact"),
            age: 30,
            gender: Gender::Female,
            password_hash: PasswordHash::new("$2b$10$fixture"),
        }
    }

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case("not-an-id", UserValidationError::InvalidId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
    fn user_id_rejects_malformed_input(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw), Err(expected));
    }

    #[test]
    fn user_id_accepts_canonical_uuid() {
        let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    #[case("12345")]
    #[case("12345678901")]
    #[case("90000x0000")]
    #[case("")]
    fn contact_number_requires_ten_digits(#[case] raw: &str) {
        assert_eq!(
            ContactNumber::new(raw),
            Err(UserValidationError::InvalidContactNumber)
        );
    }

    #[test]
    fn contact_number_trims_surrounding_whitespace() {
        let number = ContactNumber::new(" 9000000000 ").expect("valid number");
        assert_eq!(number.as_ref(), "9000000000");
    }

    #[rstest]
    #[case("Female", Gender::Female)]
    #[case("Male", Gender::Male)]
    #[case("Other", Gender::Other)]
    fn gender_parses_display_forms(#[case] raw: &str, #[case] expected: Gender) {
        assert_eq!(Gender::parse(raw), Ok(expected));
    }

    #[test]
    fn gender_rejects_unknown_values() {
        assert_eq!(Gender::parse("female"), Err(UserValidationError::UnknownGender));
    }

    #[test]
    fn created_users_start_unverified() {
        let user = User::create(sample_new_user(), Utc::now());
        assert!(!user.verified());
    }

    #[test]
    fn mark_verified_is_idempotent() {
        let mut user = User::create(sample_new_user(), Utc::now());
        user.mark_verified();
        user.mark_verified();
        assert!(user.verified());
    }

    #[test]
    fn profile_strips_the_password_hash() {
        let user = User::create(sample_new_user(), Utc::now());
        let encoded = serde_json::to_string(&user.profile()).expect("profile encodes");
        assert!(!encoded.contains("password"));
        assert!(!encoded.contains("$2b$"));
    }

    #[test]
    fn password_hash_debug_is_redacted() {
        let hash = PasswordHash::new("$2b$10$secret");
        assert_eq!(format!("{hash:?}"), "PasswordHash(<redacted>)");
    }
}
