//! PostgreSQL-backed `ApplicationRepository` implementation using Diesel ORM.
//!
//! The list query carries the ordering contract (newest first) so no
//! caller ever re-sorts client-side.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::application::{
    Application, ApplicationForm, ApplicationId, ApplicationStatus, Decision, ServiceCategory,
};
use crate::domain::ports::{ApplicationPersistenceError, ApplicationRepository};
use crate::domain::user::{Gender, UserId};

use super::models::{ApplicationRow, NewApplicationRow};
use super::pool::{DbPool, PoolError};
use super::schema::applications;

/// Diesel-backed implementation of the `ApplicationRepository` port.
#[derive(Clone)]
pub struct DieselApplicationRepository {
    pool: DbPool,
}

impl DieselApplicationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ApplicationPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ApplicationPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ApplicationPersistenceError {
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
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ApplicationPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => ApplicationPersistenceError::query("record not found"),
        _ => ApplicationPersistenceError::query("database error"),
    }
}

fn row_to_application(row: ApplicationRow) -> Result<Application, ApplicationPersistenceError> {
    let corrupt = |field: &str| {
        ApplicationPersistenceError::query(format!("unrecognised {field} value in row"))
    };

    Ok(Application::restore(
        ApplicationId::from_uuid(row.id),
        ApplicationForm {
            full_name: row.full_name,
            age: row.age,
            contact_number: row.contact_number,
            gender: Gender::parse(&row.gender).map_err(|_| corrupt("gender"))?,
            district: row.district,
            revenue_circle: row.revenue_circle,
            category: ServiceCategory::parse(&row.category).map_err(|_| corrupt("category"))?,
            village_ward: row.village_ward,
            remarks: row.remarks,
            document_url: row.document_url,
        },
        ApplicationStatus::parse(&row.status).map_err(|_| corrupt("status"))?,
        row.submitted_by.map(UserId::from_uuid),
        row.created_at,
    ))
}

fn application_to_row(application: &Application) -> NewApplicationRow<'_> {
    NewApplicationRow {
        id: *application.id().as_uuid(),
        full_name: application.full_name(),
        age: application.age(),
        contact_number: application.contact_number(),
        gender: application.gender().as_str(),
        district: application.district(),
        revenue_circle: application.revenue_circle(),
        category: application.category().as_str(),
        village_ward: application.village_ward(),
        remarks: application.remarks(),
        document_url: application.document_url(),
        status: application.status().as_str(),
        submitted_by: application.submitted_by().map(|owner| *owner.as_uuid()),
        created_at: application.created_at(),
    }
}

#[async_trait]
impl ApplicationRepository for DieselApplicationRepository {
    async fn insert(&self, application: &Application) -> Result<(), ApplicationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(applications::table)
            .values(application_to_row(application))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, ApplicationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ApplicationRow> = applications::table
            .find(id.as_uuid())
            .select(ApplicationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_application).transpose()
    }

    async fn list(
        &self,
        submitted_by: Option<UserId>,
    ) -> Result<Vec<Application>, ApplicationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = applications::table
            .select(ApplicationRow::as_select())
            .into_boxed();
        if let Some(owner) = submitted_by {
            query = query.filter(applications::submitted_by.eq(Some(*owner.as_uuid())));
        }

        let rows: Vec<ApplicationRow> = query
            .order(applications::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_application).collect()
    }

    async fn apply_decision(
        &self,
        id: &ApplicationId,
        decision: Decision,
    ) -> Result<Option<Application>, ApplicationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ApplicationRow> =
            diesel::update(applications::table.find(id.as_uuid()))
                .set(applications::status.eq(decision.target_status().as_str()))
                .returning(ApplicationRow::as_select())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;

        row.map(row_to_application).transpose()
    }
}
