//! In-memory implementations of the driven storage ports.
//!
//! Used when the server runs without a database URL (demo deployments,
//! endpoint tests) so the full HTTP surface stays exercisable. Each
//! repository is a mutex-guarded vector; the critical sections are a few
//! comparisons, so a synchronous lock is fine inside async handlers.
//!
//! Ordering contracts match the PostgreSQL adapters exactly: applications
//! and notifications newest first, users oldest first.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::application::{Application, ApplicationId, Decision};
use crate::domain::notification::{Notification, NotificationId, PushStatus};
use crate::domain::ports::{
    ApplicationPersistenceError, ApplicationRepository, DuplicateField,
    NotificationPersistenceError, NotificationRepository, UserPersistenceError, UserRepository,
};
use crate::domain::user::{ContactNumber, Email, LoginHandle, User, UserId};

fn recover<'a, T>(mutex: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
    // A poisoned lock only means another test/request panicked mid-write;
    // the data is still a plain Vec, so carry on with it.
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// In-memory [`UserRepository`].
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut rows = recover(&self.rows);
        for existing in rows.iter() {
            if existing.email() == user.email() {
                return Err(UserPersistenceError::duplicate("email"));
            }
            if existing.login_handle() == user.login_handle() {
                return Err(UserPersistenceError::duplicate("loginHandle"));
            }
            if existing.contact_number() == user.contact_number() {
                return Err(UserPersistenceError::duplicate("contactNumber"));
            }
        }
        rows.push(user.clone());
        Ok(())
    }

    async fn find_duplicate(
        &self,
        email: &Email,
        login_handle: &LoginHandle,
        contact_number: &ContactNumber,
    ) -> Result<Option<DuplicateField>, UserPersistenceError> {
        let rows = recover(&self.rows);
        for existing in rows.iter() {
            if existing.email() == email {
                return Ok(Some(DuplicateField::Email));
            }
            if existing.contact_number() == contact_number {
                return Ok(Some(DuplicateField::ContactNumber));
            }
            if existing.login_handle() == login_handle {
                return Ok(Some(DuplicateField::LoginHandle));
            }
        }
        Ok(None)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let rows = recover(&self.rows);
        Ok(rows.iter().find(|user| user.id() == id).cloned())
    }

    async fn find_by_login_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        let rows = recover(&self.rows);
        Ok(rows
            .iter()
            .find(|user| {
                user.email().as_ref() == identifier || user.contact_number().as_ref() == identifier
            })
            .cloned())
    }

    async fn set_verified(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut rows = recover(&self.rows);
        match rows.iter_mut().find(|user| user.id() == id) {
            Some(user) => {
                user.mark_verified();
                Ok(Some(user.clone()))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let rows = recover(&self.rows);
        let mut listed = rows.clone();
        listed.sort_by(|a, b| a.created_at().cmp(&b.created_at()));
        Ok(listed)
    }
}

/// In-memory [`ApplicationRepository`].
#[derive(Debug, Default)]
pub struct InMemoryApplicationRepository {
    rows: Mutex<Vec<Application>>,
}

impl InMemoryApplicationRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored applications. Exposed for test assertions.
    pub fn len(&self) -> usize {
        recover(&self.rows).len()
    }

    /// Whether the repository holds no applications.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn insert(&self, application: &Application) -> Result<(), ApplicationPersistenceError> {
        recover(&self.rows).push(application.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, ApplicationPersistenceError> {
        let rows = recover(&self.rows);
        Ok(rows.iter().find(|application| application.id() == id).cloned())
    }

    async fn list(
        &self,
        submitted_by: Option<UserId>,
    ) -> Result<Vec<Application>, ApplicationPersistenceError> {
        let rows = recover(&self.rows);
        // Reversed insertion order before the stable sort keeps ties
        // newest-first, matching the SQL adapter.
        let mut listed: Vec<Application> = rows
            .iter()
            .rev()
            .filter(|application| {
                submitted_by.is_none_or(|owner| application.submitted_by() == Some(owner))
            })
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(listed)
    }

    async fn apply_decision(
        &self,
        id: &ApplicationId,
        decision: Decision,
    ) -> Result<Option<Application>, ApplicationPersistenceError> {
        let mut rows = recover(&self.rows);
        match rows.iter_mut().find(|application| application.id() == id) {
            Some(application) => {
                application.decide(decision);
                Ok(Some(application.clone()))
            }
            None => Ok(None),
        }
    }
}

/// In-memory [`NotificationRepository`].
#[derive(Debug, Default)]
pub struct InMemoryNotificationRepository {
    rows: Mutex<Vec<Notification>>,
}

impl InMemoryNotificationRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn insert(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationPersistenceError> {
        recover(&self.rows).push(notification.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Notification>, NotificationPersistenceError> {
        let rows = recover(&self.rows);
        let mut listed: Vec<Notification> = rows.iter().rev().cloned().collect();
        listed.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(listed)
    }

    async fn delete(&self, id: &NotificationId) -> Result<bool, NotificationPersistenceError> {
        let mut rows = recover(&self.rows);
        let before = rows.len();
        rows.retain(|notification| notification.id() != id);
        Ok(rows.len() < before)
    }

    async fn set_push_status(
        &self,
        id: &NotificationId,
        status: PushStatus,
    ) -> Result<(), NotificationPersistenceError> {
        let mut rows = recover(&self.rows);
        if let Some(notification) = rows.iter_mut().find(|notification| notification.id() == id) {
            notification.record_push_outcome(status);
        }
        Ok(())
    }
}
