//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountsCommand, AccountsQuery, ApplicationsCommand, ApplicationsQuery, LoginService,
    NotificationsCommand, NotificationsQuery, StorageStatus,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Application submit/decide use-cases.
    pub applications: Arc<dyn ApplicationsCommand>,
    /// Application listing use-case.
    pub applications_query: Arc<dyn ApplicationsQuery>,
    /// Signup and verification use-cases.
    pub accounts: Arc<dyn AccountsCommand>,
    /// User listing use-case.
    pub accounts_query: Arc<dyn AccountsQuery>,
    /// Credential-based session issuance.
    pub login: Arc<dyn LoginService>,
    /// Notification publish/delete use-cases.
    pub notifications: Arc<dyn NotificationsCommand>,
    /// Notification listing use-case.
    pub notifications_query: Arc<dyn NotificationsQuery>,
    /// Storage connectivity probe for the status endpoint.
    pub storage: Arc<dyn StorageStatus>,
}
