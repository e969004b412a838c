//! PostgreSQL-backed `NotificationRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::notification::{Notification, NotificationId, PushStatus};
use crate::domain::ports::{NotificationPersistenceError, NotificationRepository};

use super::models::{NewNotificationRow, NotificationRow};
use super::pool::{DbPool, PoolError};
use super::schema::notifications;

/// Diesel-backed implementation of the `NotificationRepository` port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> NotificationPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            NotificationPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> NotificationPersistenceError {
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
            NotificationPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => NotificationPersistenceError::query("record not found"),
        _ => NotificationPersistenceError::query("database error"),
    }
}

fn row_to_notification(
    row: NotificationRow,
) -> Result<Notification, NotificationPersistenceError> {
    let push_status = PushStatus::parse(&row.push_status).ok_or_else(|| {
        NotificationPersistenceError::query("unrecognised push_status value in row")
    })?;

    Ok(Notification::restore(
        NotificationId::from_uuid(row.id),
        row.title,
        row.content,
        push_status,
        row.created_at,
    ))
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewNotificationRow {
            id: *notification.id().as_uuid(),
            title: notification.title(),
            content: notification.content(),
            push_status: notification.push_status().as_str(),
            created_at: notification.created_at(),
        };

        diesel::insert_into(notifications::table)
            .values(new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list(&self) -> Result<Vec<Notification>, NotificationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<NotificationRow> = notifications::table
            .order(notifications::created_at.desc())
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_notification).collect()
    }

    async fn delete(&self, id: &NotificationId) -> Result<bool, NotificationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(notifications::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn set_push_status(
        &self,
        id: &NotificationId,
        status: PushStatus,
    ) -> Result<(), NotificationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(notifications::table.find(id.as_uuid()))
            .set(notifications::push_status.eq(status.as_str()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
