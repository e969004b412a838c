//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts;
mod application_repository;
mod applications;
mod notification_repository;
mod notifications;
mod password_hasher;
mod push_gateway;
mod storage_status;
mod token_issuer;
mod user_repository;

#[cfg(test)]
pub use accounts::{MockAccountsCommand, MockAccountsQuery, MockLoginService};
pub use accounts::{
    AccountsCommand, AccountsQuery, AuthenticatedSession, LoginAttempt, LoginService,
    SignupDetails,
};
#[cfg(test)]
pub use application_repository::MockApplicationRepository;
pub use application_repository::{ApplicationPersistenceError, ApplicationRepository};
#[cfg(test)]
pub use applications::{MockApplicationsCommand, MockApplicationsQuery};
pub use applications::{ApplicationsCommand, ApplicationsQuery, DecideApplication, SubmitApplication};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{NotificationPersistenceError, NotificationRepository};
#[cfg(test)]
pub use notifications::{MockNotificationsCommand, MockNotificationsQuery};
pub use notifications::{NotificationsCommand, NotificationsQuery};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use push_gateway::MockPushGateway;
pub use push_gateway::{NoopPushGateway, PushBroadcast, PushGateway, PushGatewayError};
#[cfg(test)]
pub use storage_status::MockStorageStatus;
pub use storage_status::{AlwaysConnected, StorageStatus};
#[cfg(test)]
pub use token_issuer::MockTokenIssuer;
pub use token_issuer::{IssuedToken, TokenClaims, TokenError, TokenIssuer, TokenRole};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{DuplicateField, UserPersistenceError, UserRepository};
