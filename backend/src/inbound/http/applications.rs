//! Application lifecycle API handlers.
//!
//! ```text
//! POST /applications  {"fullName":"Asha Roy","age":30,...}
//! GET  /applications[?userId=<uuid>]
//! PUT  /applications  {"applicationId":"<uuid>","status":"Approved"}
//! ```
//!
//! Request bodies arrive as all-optional DTOs so validation can report
//! every missing field in one response instead of failing on the first.

use actix_web::{get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::application::{
    Application, ApplicationForm, ApplicationId, Decision, ServiceCategory,
};
use crate::domain::ports::{DecideApplication, SubmitApplication};
use crate::domain::user::{Gender, UserId};
use crate::domain::Error;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request body for `POST /applications`. Every field optional so the
/// validator can name all the gaps at once.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplicationRequest {
    /// Applicant's full name.
    pub full_name: Option<String>,
    /// Applicant age in years.
    pub age: Option<i32>,
    /// Applicant contact number.
    pub contact_number: Option<String>,
    /// Applicant gender.
    pub gender: Option<String>,
    /// District of residence.
    pub district: Option<String>,
    /// Revenue circle within the district.
    pub revenue_circle: Option<String>,
    /// Requested service category.
    pub category: Option<String>,
    /// Village or ward designation.
    pub village_ward: Option<String>,
    /// Free-text remarks.
    pub remarks: Option<String>,
    /// URL of the externally hosted supporting document.
    pub document_url: Option<String>,
    /// Identifier of the submitting user, when logged in.
    pub user_id: Option<String>,
}

/// Request body for `PUT /applications`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecideApplicationRequest {
    /// Identifier of the application to decide.
    pub application_id: Option<String>,
    /// Target status: `Approved` or `Rejected`.
    pub status: Option<String>,
}

/// Success envelope for application mutations.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApplicationResponse {
    /// Human-readable outcome.
    pub message: String,
    /// The stored record.
    pub data: Application,
}

/// Success envelope for application listings.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApplicationListResponse {
    /// The stored records, newest first.
    pub data: Vec<Application>,
}

/// Query parameters accepted by `GET /applications`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListApplicationsParams {
    /// Restrict the listing to one submitting user.
    pub user_id: Option<String>,
}

fn present(value: Option<&String>) -> bool {
    value.is_some_and(|raw| !raw.trim().is_empty())
}

impl SubmitApplicationRequest {
    /// Validate the request, reporting every missing field, then parse
    /// the closed enumerations.
    fn into_domain(self) -> Result<SubmitApplication, Error> {
        let mut missing = Vec::new();
        if !present(self.full_name.as_ref()) {
            missing.push("fullName");
        }
        if self.age.is_none_or(|age| age <= 0) {
            missing.push("age");
        }
        if !present(self.contact_number.as_ref()) {
            missing.push("contactNumber");
        }
        if !present(self.gender.as_ref()) {
            missing.push("gender");
        }
        if !present(self.district.as_ref()) {
            missing.push("district");
        }
        if !present(self.revenue_circle.as_ref()) {
            missing.push("revenueCircle");
        }
        if !present(self.category.as_ref()) {
            missing.push("category");
        }
        if !present(self.village_ward.as_ref()) {
            missing.push("villageWard");
        }
        if !missing.is_empty() {
            return Err(Error::invalid_request("Missing required fields")
                .with_details(json!({ "missing": missing })));
        }

        let gender = Gender::parse(self.gender.as_deref().unwrap_or_default())
            .map_err(|error| field_error(error.to_string(), "gender"))?;
        let category = ServiceCategory::parse(self.category.as_deref().unwrap_or_default())
            .map_err(|error| field_error(error.to_string(), "category"))?;
        let submitted_by = self
            .user_id
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(UserId::new)
            .transpose()
            .map_err(|error| field_error(error.to_string(), "userId"))?;

        Ok(SubmitApplication {
            form: ApplicationForm {
                full_name: self.full_name.unwrap_or_default(),
                age: self.age.unwrap_or_default(),
                contact_number: self.contact_number.unwrap_or_default(),
                gender,
                district: self.district.unwrap_or_default(),
                revenue_circle: self.revenue_circle.unwrap_or_default(),
                category,
                village_ward: self.village_ward.unwrap_or_default(),
                remarks: self.remarks.filter(|raw| !raw.trim().is_empty()),
                document_url: self.document_url.filter(|raw| !raw.trim().is_empty()),
            },
            submitted_by,
        })
    }
}

fn field_error(message: String, field: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field }))
}

impl DecideApplicationRequest {
    fn into_domain(self) -> Result<DecideApplication, Error> {
        let mut missing = Vec::new();
        if !present(self.application_id.as_ref()) {
            missing.push("applicationId");
        }
        if !present(self.status.as_ref()) {
            missing.push("status");
        }
        if !missing.is_empty() {
            return Err(Error::invalid_request("Application ID and status are required")
                .with_details(json!({ "missing": missing })));
        }

        let application_id = ApplicationId::new(self.application_id.unwrap_or_default())
            .map_err(|error| field_error(error.to_string(), "applicationId"))?;
        let decision = Decision::parse(self.status.as_deref().unwrap_or_default())
            .map_err(|error| field_error(error.to_string(), "status"))?;

        Ok(DecideApplication {
            application_id,
            decision,
        })
    }
}

/// Submit a new application.
#[utoipa::path(
    post,
    path = "/applications",
    request_body = SubmitApplicationRequest,
    responses(
        (status = 201, description = "Application stored", body = ApplicationResponse),
        (status = 400, description = "Missing or malformed fields", body = Error),
        (status = 500, description = "Storage failure", body = Error)
    ),
    tags = ["applications"],
    operation_id = "submitApplication"
)]
#[post("/applications")]
pub async fn submit_application(
    state: web::Data<HttpState>,
    payload: web::Json<SubmitApplicationRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner().into_domain()?;
    let stored = state.applications.submit(request).await?;
    Ok(HttpResponse::Created().json(ApplicationResponse {
        message: "Application submitted successfully".to_owned(),
        data: stored,
    }))
}

/// List applications, all or for one submitting user.
#[utoipa::path(
    get,
    path = "/applications",
    params(ListApplicationsParams),
    responses(
        (status = 200, description = "Applications, newest first", body = ApplicationListResponse),
        (status = 400, description = "Malformed userId filter", body = Error),
        (status = 500, description = "Storage failure", body = Error)
    ),
    tags = ["applications"],
    operation_id = "listApplications"
)]
#[get("/applications")]
pub async fn list_applications(
    state: web::Data<HttpState>,
    params: web::Query<ListApplicationsParams>,
) -> ApiResult<web::Json<ApplicationListResponse>> {
    let submitted_by = params
        .into_inner()
        .user_id
        .filter(|raw| !raw.trim().is_empty())
        .map(UserId::new)
        .transpose()
        .map_err(|error| field_error(error.to_string(), "userId"))?;

    let data = state.applications_query.list(submitted_by).await?;
    Ok(web::Json(ApplicationListResponse { data }))
}

/// Decide a pending application.
#[utoipa::path(
    put,
    path = "/applications",
    request_body = DecideApplicationRequest,
    responses(
        (status = 200, description = "Status updated", body = ApplicationResponse),
        (status = 400, description = "Missing or malformed fields", body = Error),
        (status = 404, description = "Unknown application", body = Error),
        (status = 409, description = "Application already decided", body = Error),
        (status = 500, description = "Storage failure", body = Error)
    ),
    tags = ["applications"],
    operation_id = "decideApplication"
)]
#[put("/applications")]
pub async fn decide_application(
    state: web::Data<HttpState>,
    payload: web::Json<DecideApplicationRequest>,
) -> ApiResult<web::Json<ApplicationResponse>> {
    let request = payload.into_inner().into_domain()?;
    let updated = state.applications.decide(request).await?;
    Ok(web::Json(ApplicationResponse {
        message: "Status updated successfully".to_owned(),
        data: updated,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;
    use serde_json::Value;

    fn full_request() -> SubmitApplicationRequest {
        SubmitApplicationRequest {
            full_name: Some("Asha Roy".to_owned()),
            age: Some(30),
            contact_number: Some("9000000000".to_owned()),
            gender: Some("Female".to_owned()),
            district: Some("Kamrup".to_owned()),
            revenue_circle: Some("X".to_owned()),
            category: Some("Education".to_owned()),
            village_ward: Some("Ward".to_owned()),
            remarks: None,
            document_url: None,
            user_id: None,
        }
    }

    #[test]
    fn validation_reports_every_missing_field_not_just_the_first() {
        let error = SubmitApplicationRequest::default()
            .into_domain()
            .expect_err("empty request");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        let details = error.details().expect("details present");
        let missing: Vec<&str> = details["missing"]
            .as_array()
            .expect("missing list")
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(
            missing,
            vec![
                "fullName",
                "age",
                "contactNumber",
                "gender",
                "district",
                "revenueCircle",
                "category",
                "villageWard"
            ]
        );
    }

    #[rstest]
    #[case(Some(0))]
    #[case(Some(-3))]
    #[case(None)]
    fn zero_or_absent_age_counts_as_missing(#[case] age: Option<i32>) {
        let request = SubmitApplicationRequest {
            age,
            ..full_request()
        };
        let error = request.into_domain().expect_err("invalid age");
        let details = error.details().expect("details present");
        assert_eq!(details["missing"], json!(["age"]));
    }

    #[test]
    fn unknown_category_is_rejected_with_the_field_name() {
        let request = SubmitApplicationRequest {
            category: Some("Transport".to_owned()),
            ..full_request()
        };
        let error = request.into_domain().expect_err("unknown category");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        let details = error.details().expect("details present");
        assert_eq!(details["field"], "category");
    }

    #[test]
    fn malformed_user_id_is_rejected() {
        let request = SubmitApplicationRequest {
            user_id: Some("not-an-id".to_owned()),
            ..full_request()
        };
        let error = request.into_domain().expect_err("malformed id");
        let details = error.details().expect("details present");
        assert_eq!(details["field"], "userId");
    }

    #[test]
    fn valid_requests_carry_their_owner_through() {
        let owner = UserId::random();
        let request = SubmitApplicationRequest {
            user_id: Some(owner.to_string()),
            ..full_request()
        };
        let domain = request.into_domain().expect("valid request");
        assert_eq!(domain.submitted_by, Some(owner));
        assert_eq!(domain.form.category, ServiceCategory::Education);
    }

    #[test]
    fn decide_requires_both_fields() {
        let error = DecideApplicationRequest {
            application_id: None,
            status: Some("Approved".to_owned()),
        }
        .into_domain()
        .expect_err("missing id");
        let details = error.details().expect("details present");
        assert_eq!(details["missing"], json!(["applicationId"]));
    }

    #[rstest]
    #[case("Pending")]
    #[case("Granted")]
    fn decide_rejects_non_terminal_statuses(#[case] status: &str) {
        let error = DecideApplicationRequest {
            application_id: Some(ApplicationId::random().to_string()),
            status: Some(status.to_owned()),
        }
        .into_domain()
        .expect_err("bad status");
        let details = error.details().expect("details present");
        assert_eq!(details["field"], "status");
    }

    #[test]
    fn decide_parses_terminal_statuses() {
        let id = ApplicationId::random();
        let domain = DecideApplicationRequest {
            application_id: Some(id.to_string()),
            status: Some("Rejected".to_owned()),
        }
        .into_domain()
        .expect("valid request");
        assert_eq!(domain.application_id, id);
        assert_eq!(domain.decision, Decision::Rejected);
    }
}
