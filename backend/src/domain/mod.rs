//! Domain primitives, aggregates, ports, and services.
//!
//! Purpose: keep the portal's business rules transport- and
//! storage-agnostic. Types are immutable where possible; each documents
//! its invariants and serde contract in its own Rustdoc. Inbound adapters
//! talk to driving ports, outbound adapters implement driven ports, and
//! nothing in here imports Actix or Diesel.

pub mod account_service;
pub mod application;
pub mod application_service;
pub mod error;
pub mod notification;
pub mod notification_service;
pub mod ports;
pub mod user;

pub use self::account_service::{AccountService, AdminCredentials};
pub use self::application::{
    Application, ApplicationForm, ApplicationId, ApplicationStatus, ApplicationValidationError,
    Decision, DecisionPolicy, ServiceCategory,
};
pub use self::application_service::ApplicationService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::notification::{
    Notification, NotificationId, NotificationValidationError, PushStatus,
};
pub use self::notification_service::NotificationService;
pub use self::user::{
    ContactNumber, Email, Gender, LoginHandle, NewUser, PasswordHash, User, UserId, UserProfile,
    UserValidationError,
};
