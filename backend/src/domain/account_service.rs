//! Account domain service: registration, login, and verification.
//!
//! Password hashing and token signing sit behind ports so this service
//! stays deterministic under test. Admin credentials are plain configured
//! values compared at login; there is no admin record in storage.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    AccountsCommand, AccountsQuery, AuthenticatedSession, IssuedToken, LoginAttempt, LoginService,
    PasswordHashError, PasswordHasher, SignupDetails, TokenClaims, TokenError, TokenIssuer,
    TokenRole, UserPersistenceError, UserRepository,
};
use crate::domain::user::{NewUser, PasswordHash, User, UserId, UserProfile};
use crate::domain::Error;

/// Configured administrator credentials.
#[derive(Clone)]
pub struct AdminCredentials {
    /// Administrator login name.
    pub username: String,
    /// Administrator password.
    pub password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Account service implementing the account driving ports.
#[derive(Clone)]
pub struct AccountService<R, H, T> {
    users: Arc<R>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    admin: AdminCredentials,
}

impl<R, H, T> AccountService<R, H, T> {
    /// Create a new service over the given adapters.
    pub fn new(users: Arc<R>, hasher: Arc<H>, tokens: Arc<T>, admin: AdminCredentials) -> Self {
        Self {
            users,
            hasher,
            tokens,
            admin,
        }
    }
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Duplicate { field } => duplicate_error(&field),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(format!("credential processing failed: {error}"))
}

fn map_token_error(error: TokenError) -> Error {
    Error::internal(format!("token issuance failed: {error}"))
}

fn duplicate_error(field: &str) -> Error {
    let label = match field {
        "contactNumber" => "phone number",
        other => other,
    };
    Error::conflict(format!("User with this {label} already exists."))
        .with_details(json!({ "field": field }))
}

impl<R, H, T> AccountService<R, H, T>
where
    R: UserRepository,
    H: PasswordHasher,
    T: TokenIssuer,
{
    fn issue_citizen_token(&self, user: &User) -> Result<IssuedToken, Error> {
        let claims = TokenClaims {
            subject: user.id().to_string(),
            email: Some(user.email().to_string()),
            role: TokenRole::Citizen,
        };
        self.tokens.issue(&claims).map_err(map_token_error)
    }
}

#[async_trait]
impl<R, H, T> AccountsCommand for AccountService<R, H, T>
where
    R: UserRepository,
    H: PasswordHasher,
    T: TokenIssuer,
{
    async fn sign_up(&self, details: SignupDetails) -> Result<UserProfile, Error> {
        if let Some(taken) = self
            .users
            .find_duplicate(&details.email, &details.login_handle, &details.contact_number)
            .await
            .map_err(map_persistence_error)?
        {
            return Err(duplicate_error(taken.as_field_name()));
        }

        let hash = self
            .hasher
            .hash(&details.password)
            .map_err(map_hash_error)?;
        let user = User::create(
            NewUser {
                first_name: details.first_name,
                middle_name: details.middle_name,
                last_name: details.last_name,
                login_handle: details.login_handle,
                email: details.email,
                contact_number: details.contact_number,
                age: details.age,
                gender: details.gender,
                password_hash: PasswordHash::new(hash),
            },
            Utc::now(),
        );

        // A concurrent signup can still win the race between the duplicate
        // check and the insert; the unique constraints report it as the
        // same conflict.
        self.users
            .insert(&user)
            .await
            .map_err(map_persistence_error)?;

        info!(user_id = %user.id(), "user registered");
        Ok(user.profile())
    }

    async fn verify(&self, id: UserId) -> Result<UserProfile, Error> {
        let updated = self
            .users
            .set_verified(&id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("User not found"))?;

        info!(user_id = %id, "user verified");
        Ok(updated.profile())
    }
}

#[async_trait]
impl<R, H, T> AccountsQuery for AccountService<R, H, T>
where
    R: UserRepository,
    H: PasswordHasher,
    T: TokenIssuer,
{
    async fn list_users(&self) -> Result<Vec<UserProfile>, Error> {
        let users = self.users.list().await.map_err(map_persistence_error)?;
        Ok(users.iter().map(User::profile).collect())
    }
}

#[async_trait]
impl<R, H, T> LoginService for AccountService<R, H, T>
where
    R: UserRepository,
    H: PasswordHasher,
    T: TokenIssuer,
{
    async fn login(&self, attempt: LoginAttempt) -> Result<AuthenticatedSession, Error> {
        let user = self
            .users
            .find_by_login_identifier(&attempt.identifier)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("User not found"))?;

        if !user.verified() {
            return Err(Error::forbidden("Account not verified")
                .with_details(json!({ "hint": "Please contact support for verification." })));
        }

        let matches = self
            .hasher
            .verify(&attempt.password, user.password_hash().as_str())
            .map_err(map_hash_error)?;
        if !matches {
            return Err(Error::unauthorized("Invalid credentials"));
        }

        let token = self.issue_citizen_token(&user)?;
        info!(user_id = %user.id(), "user logged in");
        Ok(AuthenticatedSession {
            token,
            user: user.profile(),
        })
    }

    async fn admin_login(&self, username: &str, password: &str) -> Result<IssuedToken, Error> {
        if username != self.admin.username || password != self.admin.password {
            return Err(Error::unauthorized("Invalid credentials"));
        }

        let claims = TokenClaims {
            subject: self.admin.username.clone(),
            email: None,
            role: TokenRole::Admin,
        };
        let token = self.tokens.issue(&claims).map_err(map_token_error)?;
        info!(username, "administrator logged in");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        DuplicateField, MockPasswordHasher, MockTokenIssuer, MockUserRepository,
    };
    use crate::domain::user::{ContactNumber, Email, Gender, LoginHandle};
    use crate::domain::ErrorCode;
    use chrono::Duration;

    fn admin() -> AdminCredentials {
        AdminCredentials {
            username: "admin".to_owned(),
            password: "letmein".to_owned(),
        }
    }

    fn details() -> SignupDetails {
        SignupDetails {
            first_name: "Asha".to_owned(),
            middle_name: None,
            last_name: "Roy".to_owned(),
            login_handle: LoginHandle::new("asha.roy").expect("handle"),
            email: Email::new("asha@example.org").expect("email"),
            contact_number: ContactNumber::new("9000000000").expect("contact"),
            age: 30,
            gender: Gender::Female,
            password: "s3cret".to_owned(),
        }
    }

    fn stored_user(verified: bool) -> User {
        let d = details();
        User::restore(
            UserId::random(),
            NewUser {
                first_name: d.first_name,
                middle_name: d.middle_name,
                last_name: d.last_name,
                login_handle: d.login_handle,
                email: d.email,
                contact_number: d.contact_number,
                age: d.age,
                gender: d.gender,
                password_hash: PasswordHash::new("$2b$10$fixture"),
            },
            verified,
            Utc::now(),
        )
    }

    fn issued() -> IssuedToken {
        IssuedToken {
            token: "signed.token".to_owned(),
            expires_at: Utc::now() + Duration::days(7),
        }
    }

    fn make_service(
        users: MockUserRepository,
        hasher: MockPasswordHasher,
        tokens: MockTokenIssuer,
    ) -> AccountService<MockUserRepository, MockPasswordHasher, MockTokenIssuer> {
        AccountService::new(Arc::new(users), Arc::new(hasher), Arc::new(tokens), admin())
    }

    #[tokio::test]
    async fn sign_up_hashes_and_persists_an_unverified_user() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_duplicate()
            .times(1)
            .return_once(|_, _, _| Ok(None));
        users
            .expect_insert()
            .withf(|user: &User| {
                !user.verified() && user.password_hash().as_str() == "$2b$10$hashed"
            })
            .times(1)
            .return_once(|_| Ok(()));

        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .withf(|plaintext| plaintext == "s3cret")
            .times(1)
            .return_once(|_| Ok("$2b$10$hashed".to_owned()));

        let service = make_service(users, hasher, MockTokenIssuer::new());
        let profile = service.sign_up(details()).await.expect("signup succeeds");
        assert!(!profile.verified);
        assert_eq!(profile.first_name, "Asha");
    }

    #[tokio::test]
    async fn sign_up_rejects_duplicate_email_without_writing() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_duplicate()
            .times(1)
            .return_once(|_, _, _| Ok(Some(DuplicateField::Email)));
        users.expect_insert().times(0);

        let service = make_service(users, MockPasswordHasher::new(), MockTokenIssuer::new());
        let error = service.sign_up(details()).await.expect_err("conflict");
        assert_eq!(error.code(), ErrorCode::Conflict);
        let details_value = error.details().expect("details present");
        assert_eq!(details_value["field"], "email");
    }

    #[tokio::test]
    async fn verify_is_idempotent_across_repeated_calls() {
        let first = stored_user(true);
        let id = *first.id();
        let second = first.clone();

        let mut users = MockUserRepository::new();
        let mut returns = vec![Ok(Some(second)), Ok(Some(first))];
        users
            .expect_set_verified()
            .times(2)
            .returning(move |_| returns.pop().unwrap_or(Ok(None)));

        let service = make_service(users, MockPasswordHasher::new(), MockTokenIssuer::new());
        let once = service.verify(id).await.expect("first verify");
        let twice = service.verify(id).await.expect("second verify");
        assert!(once.verified);
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn verify_unknown_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users
            .expect_set_verified()
            .times(1)
            .return_once(|_| Ok(None));

        let service = make_service(users, MockPasswordHasher::new(), MockTokenIssuer::new());
        let error = service.verify(UserId::random()).await.expect_err("missing");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn login_rejects_unknown_identifiers_with_not_found() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_login_identifier()
            .times(1)
            .return_once(|_| Ok(None));

        let service = make_service(users, MockPasswordHasher::new(), MockTokenIssuer::new());
        let error = service
            .login(LoginAttempt {
                identifier: "nobody@example.org".to_owned(),
                password: "whatever".to_owned(),
            })
            .await
            .expect_err("not found");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn login_refuses_unverified_accounts_before_checking_the_password() {
        let unverified = stored_user(false);
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_login_identifier()
            .times(1)
            .return_once(move |_| Ok(Some(unverified)));

        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().times(0);

        let service = make_service(users, hasher, MockTokenIssuer::new());
        let error = service
            .login(LoginAttempt {
                identifier: "asha@example.org".to_owned(),
                password: "s3cret".to_owned(),
            })
            .await
            .expect_err("forbidden");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn login_rejects_wrong_passwords_with_unauthorized() {
        let verified = stored_user(true);
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_login_identifier()
            .times(1)
            .return_once(move |_| Ok(Some(verified)));

        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().times(1).return_once(|_, _| Ok(false));

        let service = make_service(users, hasher, MockTokenIssuer::new());
        let error = service
            .login(LoginAttempt {
                identifier: "asha@example.org".to_owned(),
                password: "wrong".to_owned(),
            })
            .await
            .expect_err("unauthorized");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn login_issues_a_citizen_token_with_the_profile() {
        let verified = stored_user(true);
        let email = verified.email().to_string();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_login_identifier()
            .times(1)
            .return_once(move |_| Ok(Some(verified)));

        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().times(1).return_once(|_, _| Ok(true));

        let mut tokens = MockTokenIssuer::new();
        let expected_email = email.clone();
        tokens
            .expect_issue()
            .withf(move |claims: &TokenClaims| {
                claims.role == TokenRole::Citizen
                    && claims.email.as_deref() == Some(expected_email.as_str())
            })
            .times(1)
            .return_once(|_| Ok(issued()));

        let service = make_service(users, hasher, tokens);
        let session = service
            .login(LoginAttempt {
                identifier: email,
                password: "s3cret".to_owned(),
            })
            .await
            .expect("login succeeds");
        assert_eq!(session.token.token, "signed.token");
        assert!(session.user.verified);
    }

    #[tokio::test]
    async fn admin_login_checks_the_configured_credentials() {
        let mut tokens = MockTokenIssuer::new();
        tokens
            .expect_issue()
            .withf(|claims: &TokenClaims| claims.role == TokenRole::Admin)
            .times(1)
            .return_once(|_| Ok(issued()));

        let service = make_service(MockUserRepository::new(), MockPasswordHasher::new(), tokens);
        let token = service
            .admin_login("admin", "letmein")
            .await
            .expect("admin login succeeds");
        assert_eq!(token.token, "signed.token");

        let error = service
            .admin_login("admin", "wrong")
            .await
            .expect_err("unauthorized");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn list_users_strips_password_hashes() {
        let user = stored_user(false);
        let mut users = MockUserRepository::new();
        users.expect_list().times(1).return_once(move || Ok(vec![user]));

        let service = make_service(users, MockPasswordHasher::new(), MockTokenIssuer::new());
        let profiles = service.list_users().await.expect("list succeeds");
        let encoded = serde_json::to_string(&profiles).expect("profiles encode");
        assert!(!encoded.contains("password"));
    }
}
