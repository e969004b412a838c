//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Registered portal users.
    ///
    /// `email`, `login_handle`, and `contact_number` carry unique
    /// constraints; `verified` defaults to false.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Required first name.
        first_name -> Varchar,
        /// Optional middle name.
        middle_name -> Nullable<Varchar>,
        /// Required last name.
        last_name -> Varchar,
        /// Unique login handle chosen at signup.
        login_handle -> Varchar,
        /// Unique email address.
        email -> Varchar,
        /// Unique ten-digit contact number.
        contact_number -> Varchar,
        /// Age in years.
        age -> Int4,
        /// Gender display string.
        gender -> Varchar,
        /// Bcrypt password hash.
        password_hash -> Varchar,
        /// Whether an administrator has verified the account.
        verified -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Citizen service applications.
    ///
    /// `submitted_by` is deliberately not a foreign key: applications may
    /// outlive or outreference their submitting user.
    applications (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Applicant's full name.
        full_name -> Varchar,
        /// Applicant age in years.
        age -> Int4,
        /// Applicant contact number.
        contact_number -> Varchar,
        /// Applicant gender display string.
        gender -> Varchar,
        /// District of residence.
        district -> Varchar,
        /// Revenue circle within the district.
        revenue_circle -> Varchar,
        /// Service category display string.
        category -> Varchar,
        /// Village or ward designation.
        village_ward -> Varchar,
        /// Free-text remarks.
        remarks -> Nullable<Text>,
        /// URL of the externally hosted supporting document.
        document_url -> Nullable<Text>,
        /// Review status display string.
        status -> Varchar,
        /// Weak reference to the submitting user; null for anonymous
        /// submissions.
        submitted_by -> Nullable<Uuid>,
        /// Submission timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Broadcast notifications.
    notifications (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Headline text.
        title -> Varchar,
        /// Body text.
        content -> Text,
        /// Push delivery status display string.
        push_status -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}
