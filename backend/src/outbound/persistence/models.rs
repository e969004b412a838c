//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and
//! must never be exposed to the domain. They exist solely to satisfy
//! Diesel's type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{applications, notifications, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub login_handle: String,
    pub email: String,
    pub contact_number: String,
    pub age: i32,
    pub gender: String,
    pub password_hash: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub first_name: &'a str,
    pub middle_name: Option<&'a str>,
    pub last_name: &'a str,
    pub login_handle: &'a str,
    pub email: &'a str,
    pub contact_number: &'a str,
    pub age: i32,
    pub gender: &'a str,
    pub password_hash: &'a str,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the applications table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ApplicationRow {
    pub id: Uuid,
    pub full_name: String,
    pub age: i32,
    pub contact_number: String,
    pub gender: String,
    pub district: String,
    pub revenue_circle: String,
    pub category: String,
    pub village_ward: String,
    pub remarks: Option<String>,
    pub document_url: Option<String>,
    pub status: String,
    pub submitted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new application records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = applications)]
pub(crate) struct NewApplicationRow<'a> {
    pub id: Uuid,
    pub full_name: &'a str,
    pub age: i32,
    pub contact_number: &'a str,
    pub gender: &'a str,
    pub district: &'a str,
    pub revenue_circle: &'a str,
    pub category: &'a str,
    pub village_ward: &'a str,
    pub remarks: Option<&'a str>,
    pub document_url: Option<&'a str>,
    pub status: &'a str,
    pub submitted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the notifications table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub push_status: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new notification records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub content: &'a str,
    pub push_status: &'a str,
    pub created_at: DateTime<Utc>,
}
