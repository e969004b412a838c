//! Dashboard summary handler.
//!
//! Issues the user-list and application-list reads concurrently and joins
//! them in memory into display counts. A convenience for the admin
//! dashboard, not a correctness mechanism.

use actix_web::{get, web};
use futures_util::try_join;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::application::ApplicationStatus;
use crate::domain::Error;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// User counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserCounts {
    /// Every registered user.
    pub total: usize,
    /// Users still awaiting verification.
    pub pending_verification: usize,
}

/// Application counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationCounts {
    /// Every stored application.
    pub total: usize,
    /// Applications awaiting a decision.
    pub pending: usize,
    /// Approved applications.
    pub approved: usize,
    /// Rejected applications.
    pub rejected: usize,
}

/// Success envelope for `GET /summary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    /// User counts.
    pub users: UserCounts,
    /// Application counts.
    pub applications: ApplicationCounts,
}

/// Aggregate dashboard counts from two concurrent reads.
#[utoipa::path(
    get,
    path = "/summary",
    responses(
        (status = 200, description = "Dashboard counts", body = SummaryResponse),
        (status = 500, description = "Storage failure", body = Error)
    ),
    tags = ["summary"],
    operation_id = "dashboardSummary"
)]
#[get("/summary")]
pub async fn dashboard_summary(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<SummaryResponse>> {
    let (users, applications) = try_join!(
        state.accounts_query.list_users(),
        state.applications_query.list(None)
    )?;

    let by_status = |status: ApplicationStatus| {
        applications
            .iter()
            .filter(|application| application.status() == status)
            .count()
    };

    Ok(web::Json(SummaryResponse {
        users: UserCounts {
            total: users.len(),
            pending_verification: users.iter().filter(|user| !user.verified).count(),
        },
        applications: ApplicationCounts {
            total: applications.len(),
            pending: by_status(ApplicationStatus::Pending),
            approved: by_status(ApplicationStatus::Approved),
            rejected: by_status(ApplicationStatus::Rejected),
        },
    }))
}
