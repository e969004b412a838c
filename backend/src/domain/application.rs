//! Service application aggregate and its status state machine.
//!
//! An application is submitted by a citizen, starts `Pending`, and is
//! decided exactly once by an administrator:
//!
//! ```text
//! [Pending] --approve--> [Approved]   (terminal)
//! [Pending] --reject---> [Rejected]   (terminal)
//! ```
//!
//! Whether a decided application may be re-decided is a deployment policy
//! ([`DecisionPolicy`]), not a guess: the guard is on by default and can
//! be relaxed to allow administrator overrides.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::{Gender, UserId};

/// Validation errors raised by application value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationValidationError {
    /// The identifier string was not a well-formed UUID.
    InvalidId,
    /// The category string was not one of the accepted values.
    UnknownCategory,
    /// The status string was not one of the accepted values.
    UnknownStatus,
    /// The decision string was neither `Approved` nor `Rejected`.
    UnknownDecision,
}

impl fmt::Display for ApplicationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "application id must be a valid UUID"),
            Self::UnknownCategory => write!(f, "category is not one of the offered services"),
            Self::UnknownStatus => {
                write!(f, "status must be Pending, Approved, or Rejected")
            }
            Self::UnknownDecision => write!(f, "decision must be Approved or Rejected"),
        }
    }
}

impl std::error::Error for ApplicationValidationError {}

/// Stable application identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApplicationId(Uuid);

impl ApplicationId {
    /// Validate and construct an [`ApplicationId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ApplicationValidationError> {
        let parsed =
            Uuid::parse_str(id.as_ref()).map_err(|_| ApplicationValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Generate a new random [`ApplicationId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an already-parsed UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ApplicationId> for String {
    fn from(value: ApplicationId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for ApplicationId {
    type Error = ApplicationValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Closed enumeration of service categories offered by the office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ServiceCategory {
    /// General administration services.
    Administration,
    /// Legal certificates and attestations.
    Legal,
    /// Trade and business services.
    Business,
    /// Disaster relief claims.
    #[serde(rename = "Disaster Relief")]
    DisasterRelief,
    /// Revenue and finance services.
    Finance,
    /// Education services.
    Education,
    /// Anything not covered above.
    Other,
}

impl ServiceCategory {
    /// Parse a category from its display form.
    pub fn parse(raw: &str) -> Result<Self, ApplicationValidationError> {
        match raw.trim() {
            "Administration" => Ok(Self::Administration),
            "Legal" => Ok(Self::Legal),
            "Business" => Ok(Self::Business),
            "Disaster Relief" => Ok(Self::DisasterRelief),
            "Finance" => Ok(Self::Finance),
            "Education" => Ok(Self::Education),
            "Other" => Ok(Self::Other),
            _ => Err(ApplicationValidationError::UnknownCategory),
        }
    }

    /// Stable storage form of the category.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Administration => "Administration",
            Self::Legal => "Legal",
            Self::Business => "Business",
            Self::DisasterRelief => "Disaster Relief",
            Self::Finance => "Finance",
            Self::Education => "Education",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review status of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ApplicationStatus {
    /// Awaiting an administrator decision.
    Pending,
    /// Approved by an administrator. Terminal under the default policy.
    Approved,
    /// Rejected by an administrator. Terminal under the default policy.
    Rejected,
}

impl ApplicationStatus {
    /// Parse a status from its display form.
    pub fn parse(raw: &str) -> Result<Self, ApplicationValidationError> {
        match raw.trim() {
            "Pending" => Ok(Self::Pending),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            _ => Err(ApplicationValidationError::UnknownStatus),
        }
    }

    /// Stable storage form of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Administrator decision on a pending application.
///
/// Deliberately excludes `Pending`: a decision always moves the record to
/// a terminal status, so "back to Pending" is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Decision {
    /// Approve the application.
    Approved,
    /// Reject the application.
    Rejected,
}

impl Decision {
    /// Parse a decision from its display form.
    pub fn parse(raw: &str) -> Result<Self, ApplicationValidationError> {
        match raw.trim() {
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            _ => Err(ApplicationValidationError::UnknownDecision),
        }
    }

    /// The status this decision moves the application to.
    pub const fn target_status(self) -> ApplicationStatus {
        match self {
            Self::Approved => ApplicationStatus::Approved,
            Self::Rejected => ApplicationStatus::Rejected,
        }
    }
}

/// Policy controlling transitions out of a decided status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecisionPolicy {
    /// Only `Pending` applications may be decided. A second decision on
    /// the same record is a conflict.
    #[default]
    PendingOnly,
    /// Administrators may re-decide an already-decided application.
    /// Concurrent decisions race last-writer-wins.
    AllowOverride,
}

impl DecisionPolicy {
    /// Whether a record in `current` status accepts a new decision.
    pub const fn permits(self, current: ApplicationStatus) -> bool {
        match self {
            Self::PendingOnly => matches!(current, ApplicationStatus::Pending),
            Self::AllowOverride => true,
        }
    }
}

/// Citizen service request tracked through the review state machine.
///
/// ## Invariants
/// - `status` starts `Pending`; the submitter cannot influence it.
/// - `submitted_by` is a weak reference: storage does not enforce that
///   the user still exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Stable identifier.
    #[schema(value_type = String, example = "7e0bb2a4-93ee-4f25-8e19-3cb42d2c7a01")]
    id: ApplicationId,
    /// Applicant's full name as written on the form.
    full_name: String,
    /// Applicant age in years.
    age: i32,
    /// Applicant contact number.
    contact_number: String,
    /// Applicant gender.
    gender: Gender,
    /// District of residence.
    district: String,
    /// Revenue circle within the district.
    revenue_circle: String,
    /// Requested service category.
    category: ServiceCategory,
    /// Village or ward designation.
    village_ward: String,
    /// Free-text remarks.
    #[serde(skip_serializing_if = "Option::is_none")]
    remarks: Option<String>,
    /// URL of the externally hosted supporting document.
    #[serde(skip_serializing_if = "Option::is_none")]
    document_url: Option<String>,
    /// Review status.
    status: ApplicationStatus,
    /// Weak reference to the submitting user. Absent for anonymous
    /// submissions from the earlier intake revision.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    submitted_by: Option<UserId>,
    /// Submission timestamp.
    created_at: DateTime<Utc>,
}

/// Validated field bundle for submitting an [`Application`].
#[derive(Debug, Clone)]
pub struct ApplicationForm {
    /// Applicant's full name.
    pub full_name: String,
    /// Applicant age, strictly positive.
    pub age: i32,
    /// Applicant contact number.
    pub contact_number: String,
    /// Applicant gender.
    pub gender: Gender,
    /// District of residence.
    pub district: String,
    /// Revenue circle within the district.
    pub revenue_circle: String,
    /// Requested service category.
    pub category: ServiceCategory,
    /// Village or ward designation.
    pub village_ward: String,
    /// Free-text remarks.
    pub remarks: Option<String>,
    /// URL of the externally hosted supporting document.
    pub document_url: Option<String>,
}

impl Application {
    /// Create a freshly submitted application. The status is always
    /// `Pending` regardless of anything the caller supplied upstream.
    pub fn submit(
        form: ApplicationForm,
        submitted_by: Option<UserId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ApplicationId::random(),
            full_name: form.full_name,
            age: form.age,
            contact_number: form.contact_number,
            gender: form.gender,
            district: form.district,
            revenue_circle: form.revenue_circle,
            category: form.category,
            village_ward: form.village_ward,
            remarks: form.remarks,
            document_url: form.document_url,
            status: ApplicationStatus::Pending,
            submitted_by,
            created_at,
        }
    }

    /// Rehydrate an application from storage.
    pub fn restore(
        id: ApplicationId,
        form: ApplicationForm,
        status: ApplicationStatus,
        submitted_by: Option<UserId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            full_name: form.full_name,
            age: form.age,
            contact_number: form.contact_number,
            gender: form.gender,
            district: form.district,
            revenue_circle: form.revenue_circle,
            category: form.category,
            village_ward: form.village_ward,
            remarks: form.remarks,
            document_url: form.document_url,
            status,
            submitted_by,
            created_at,
        }
    }

    /// Stable identifier.
    pub const fn id(&self) -> &ApplicationId {
        &self.id
    }

    /// Applicant's full name.
    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }

    /// Applicant age in years.
    pub const fn age(&self) -> i32 {
        self.age
    }

    /// Applicant contact number.
    pub fn contact_number(&self) -> &str {
        self.contact_number.as_str()
    }

    /// Applicant gender.
    pub const fn gender(&self) -> Gender {
        self.gender
    }

    /// District of residence.
    pub fn district(&self) -> &str {
        self.district.as_str()
    }

    /// Revenue circle within the district.
    pub fn revenue_circle(&self) -> &str {
        self.revenue_circle.as_str()
    }

    /// Requested service category.
    pub const fn category(&self) -> ServiceCategory {
        self.category
    }

    /// Village or ward designation.
    pub fn village_ward(&self) -> &str {
        self.village_ward.as_str()
    }

    /// Free-text remarks.
    pub fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    /// Supporting document URL.
    pub fn document_url(&self) -> Option<&str> {
        self.document_url.as_deref()
    }

    /// Review status.
    pub const fn status(&self) -> ApplicationStatus {
        self.status
    }

    /// Weak reference to the submitting user, when one was supplied.
    pub const fn submitted_by(&self) -> Option<UserId> {
        self.submitted_by
    }

    /// Submission timestamp.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Apply a decision, moving the record to the decision's target status.
    pub fn decide(&mut self, decision: Decision) {
        self.status = decision.target_status();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample_form() -> ApplicationForm {
        ApplicationForm {
            full_name: "Asha Roy".to_owned(),
            age: 30,
            contact_number: "9000000000".to_owned(),
            gender: Gender::Female,
            district: "Kamrup".to_owned(),
            revenue_circle: "X".to_owned(),
            category: ServiceCategory::Education,
            village_ward: "Ward".to_owned(),
            remarks: None,
            document_url: None,
        }
    }

    #[test]
    fn submitted_applications_start_pending() {
        let application = Application::submit(sample_form(), Some(UserId::random()), Utc::now());
        assert_eq!(application.status(), ApplicationStatus::Pending);
    }

    #[rstest]
    #[case(Decision::Approved, ApplicationStatus::Approved)]
    #[case(Decision::Rejected, ApplicationStatus::Rejected)]
    fn decisions_move_to_their_target_status(
        #[case] decision: Decision,
        #[case] expected: ApplicationStatus,
    ) {
        let mut application = Application::submit(sample_form(), Some(UserId::random()), Utc::now());
        application.decide(decision);
        assert_eq!(application.status(), expected);
    }

    #[rstest]
    #[case("Administration", ServiceCategory::Administration)]
    #[case("Legal", ServiceCategory::Legal)]
    #[case("Business", ServiceCategory::Business)]
    #[case("Disaster Relief", ServiceCategory::DisasterRelief)]
    #[case("Finance", ServiceCategory::Finance)]
    #[case("Education", ServiceCategory::Education)]
    #[case("Other", ServiceCategory::Other)]
    fn categories_parse_their_display_forms(
        #[case] raw: &str,
        #[case] expected: ServiceCategory,
    ) {
        assert_eq!(ServiceCategory::parse(raw), Ok(expected));
        assert_eq!(expected.as_str(), raw);
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert_eq!(
            ServiceCategory::parse("Transport"),
            Err(ApplicationValidationError::UnknownCategory)
        );
    }

    #[rstest]
    #[case("Pending")]
    #[case("pending")]
    #[case("")]
    fn decision_rejects_everything_but_the_two_terminals(#[case] raw: &str) {
        assert_eq!(
            Decision::parse(raw),
            Err(ApplicationValidationError::UnknownDecision)
        );
    }

    #[rstest]
    #[case(DecisionPolicy::PendingOnly, ApplicationStatus::Pending, true)]
    #[case(DecisionPolicy::PendingOnly, ApplicationStatus::Approved, false)]
    #[case(DecisionPolicy::PendingOnly, ApplicationStatus::Rejected, false)]
    #[case(DecisionPolicy::AllowOverride, ApplicationStatus::Approved, true)]
    #[case(DecisionPolicy::AllowOverride, ApplicationStatus::Rejected, true)]
    fn decision_policy_guards_decided_records(
        #[case] policy: DecisionPolicy,
        #[case] current: ApplicationStatus,
        #[case] permitted: bool,
    ) {
        assert_eq!(policy.permits(current), permitted);
    }

    #[test]
    fn serialises_camel_case_with_plain_status_strings() {
        let application = Application::submit(sample_form(), Some(UserId::random()), Utc::now());
        let value = serde_json::to_value(&application).expect("application encodes");
        assert_eq!(value["status"], "Pending");
        assert_eq!(value["fullName"], "Asha Roy");
        assert_eq!(value["revenueCircle"], "X");
        assert!(value.get("remarks").is_none());
    }
}
