//! Shared fixtures for HTTP adapter tests.
//!
//! Builds an [`HttpState`] wired with real domain services over in-memory
//! adapters, so endpoint tests exercise the same code paths as a
//! database-less deployment.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;

use crate::domain::application::DecisionPolicy;
use crate::domain::ports::{AlwaysConnected, PushBroadcast, PushGateway, PushGatewayError};
use crate::domain::{AccountService, AdminCredentials, ApplicationService, NotificationService};
use crate::inbound::http::state::HttpState;
use crate::outbound::auth::{BcryptPasswordHasher, JwtTokenIssuer};
use crate::outbound::memory::{
    InMemoryApplicationRepository, InMemoryNotificationRepository, InMemoryUserRepository,
};

/// Admin username every test state accepts.
pub(crate) const TEST_ADMIN_USERNAME: &str = "admin";
/// Admin password every test state accepts.
pub(crate) const TEST_ADMIN_PASSWORD: &str = "letmein";

/// Push gateway stub with a switchable outcome.
pub(crate) struct StubPushGateway {
    fail: bool,
}

#[async_trait]
impl PushGateway for StubPushGateway {
    async fn broadcast(&self, _message: &PushBroadcast) -> Result<(), PushGatewayError> {
        if self.fail {
            Err(PushGatewayError::transport("stub gateway unreachable"))
        } else {
            Ok(())
        }
    }
}

/// Default test state: guarded decisions, healthy push gateway.
pub(crate) fn test_state() -> HttpState {
    test_state_with(DecisionPolicy::default(), false)
}

/// Test state with explicit decision policy and push outcome.
pub(crate) fn test_state_with(policy: DecisionPolicy, push_fails: bool) -> HttpState {
    let users = Arc::new(InMemoryUserRepository::new());
    let applications = Arc::new(InMemoryApplicationRepository::new());
    let notifications = Arc::new(InMemoryNotificationRepository::new());

    // Minimum bcrypt cost keeps endpoint tests fast.
    let hasher = Arc::new(BcryptPasswordHasher::with_cost(4));
    let tokens = Arc::new(JwtTokenIssuer::new("test-secret", Duration::days(7)));
    let admin = AdminCredentials {
        username: TEST_ADMIN_USERNAME.to_owned(),
        password: TEST_ADMIN_PASSWORD.to_owned(),
    };

    let accounts = Arc::new(AccountService::new(users, hasher, tokens, admin));
    let applications_service = Arc::new(ApplicationService::new(applications, policy));
    let notifications_service = Arc::new(NotificationService::new(
        notifications,
        Arc::new(StubPushGateway { fail: push_fails }),
    ));

    HttpState {
        applications: applications_service.clone(),
        applications_query: applications_service,
        accounts: accounts.clone(),
        accounts_query: accounts.clone(),
        login: accounts,
        notifications: notifications_service.clone(),
        notifications_query: notifications_service,
        storage: Arc::new(AlwaysConnected),
    }
}
