//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! A thin adapter translating between Diesel row structs and the domain
//! user aggregate. Unique-constraint violations are mapped back to the
//! field they protect so signup conflicts stay typed end to end.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{DuplicateField, UserPersistenceError, UserRepository};
use crate::domain::user::{
    ContactNumber, Email, Gender, LoginHandle, NewUser, PasswordHash, User, UserId,
};

use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            UserPersistenceError::duplicate(duplicate_field_for_constraint(
                info.constraint_name(),
            ))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        _ => UserPersistenceError::query("database error"),
    }
}

fn duplicate_field_for_constraint(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("users_email_key") => "email",
        Some("users_contact_number_key") => "contactNumber",
        _ => "loginHandle",
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let corrupt =
        |field: &str| UserPersistenceError::query(format!("unrecognised {field} value in row"));

    Ok(User::restore(
        UserId::from_uuid(row.id),
        NewUser {
            first_name: row.first_name,
            middle_name: row.middle_name,
            last_name: row.last_name,
            login_handle: LoginHandle::new(row.login_handle)
                .map_err(|_| corrupt("login_handle"))?,
            email: Email::new(row.email).map_err(|_| corrupt("email"))?,
            contact_number: ContactNumber::new(row.contact_number)
                .map_err(|_| corrupt("contact_number"))?,
            age: row.age,
            gender: Gender::parse(&row.gender).map_err(|_| corrupt("gender"))?,
            password_hash: PasswordHash::new(row.password_hash),
        },
        row.verified,
        row.created_at,
    ))
}

fn user_to_row(user: &User) -> NewUserRow<'_> {
    NewUserRow {
        id: *user.id().as_uuid(),
        first_name: user.first_name(),
        middle_name: user.middle_name(),
        last_name: user.last_name(),
        login_handle: user.login_handle().as_ref(),
        email: user.email().as_ref(),
        contact_number: user.contact_number().as_ref(),
        age: user.age(),
        gender: user.gender().as_str(),
        password_hash: user.password_hash().as_str(),
        verified: user.verified(),
        created_at: user.created_at(),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(users::table)
            .values(user_to_row(user))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_duplicate(
        &self,
        email: &Email,
        login_handle: &LoginHandle,
        contact_number: &ContactNumber,
    ) -> Result<Option<DuplicateField>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let existing: Option<UserRow> = users::table
            .filter(
                users::email
                    .eq(email.as_ref())
                    .or(users::login_handle.eq(login_handle.as_ref()))
                    .or(users::contact_number.eq(contact_number.as_ref())),
            )
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(existing.map(|row| {
            if row.email == email.as_ref() {
                DuplicateField::Email
            } else if row.contact_number == contact_number.as_ref() {
                DuplicateField::ContactNumber
            } else {
                DuplicateField::LoginHandle
            }
        }))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_login_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(
                users::email
                    .eq(identifier)
                    .or(users::contact_number.eq(identifier)),
            )
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn set_verified(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = diesel::update(users::table.find(id.as_uuid()))
            .set(users::verified.eq(true))
            .returning(UserRow::as_select())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .order(users::created_at.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_user).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the non-network mapping helpers.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(repo_err, UserPersistenceError::Connection { .. }));
        assert!(repo_err.to_string().contains("connection refused"));
    }

    #[rstest]
    #[case(Some("users_email_key"), "email")]
    #[case(Some("users_contact_number_key"), "contactNumber")]
    #[case(Some("users_login_handle_key"), "loginHandle")]
    #[case(None, "loginHandle")]
    fn unique_constraints_map_to_their_fields(
        #[case] constraint: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(duplicate_field_for_constraint(constraint), expected);
    }

    #[rstest]
    fn corrupt_gender_rows_surface_as_query_errors() {
        let row = UserRow {
            id: uuid::Uuid::new_v4(),
            first_name: "Asha".to_owned(),
            middle_name: None,
            last_name: "Roy".to_owned(),
            login_handle: "asha.roy".to_owned(),
            email: "asha@example.org".to_owned(),
            contact_number: "9000000000".to_owned(),
            age: 30,
            gender: "unknown".to_owned(),
            password_hash: "$2b$10$fixture".to_owned(),
            verified: false,
            created_at: chrono::Utc::now(),
        };

        let error = row_to_user(row).expect_err("corrupt row");
        assert!(matches!(error, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    fn rows_round_trip_to_domain_users() {
        let row = UserRow {
            id: uuid::Uuid::new_v4(),
            first_name: "Asha".to_owned(),
            middle_name: Some("K".to_owned()),
            last_name: "Roy".to_owned(),
            login_handle: "asha.roy".to_owned(),
            email: "asha@example.org".to_owned(),
            contact_number: "9000000000".to_owned(),
            age: 30,
            gender: "Female".to_owned(),
            password_hash: "$2b$10$fixture".to_owned(),
            verified: true,
            created_at: chrono::Utc::now(),
        };

        let user = row_to_user(row).expect("valid row");
        assert!(user.verified());
        assert_eq!(user.middle_name(), Some("K"));
        assert_eq!(user.gender(), Gender::Female);
    }
}
