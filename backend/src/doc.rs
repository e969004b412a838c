//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: every endpoint from the inbound layer plus the shared
//! error envelope. Swagger UI serves the document in debug builds.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Sewa portal backend API",
        description = "HTTP interface for citizen applications, account management, and notification broadcast."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::applications::submit_application,
        crate::inbound::http::applications::list_applications,
        crate::inbound::http::applications::decide_application,
        crate::inbound::http::accounts::sign_up,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::admin_login,
        crate::inbound::http::accounts::list_users,
        crate::inbound::http::accounts::approve_user,
        crate::inbound::http::notifications::publish_notification,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::delete_notification,
        crate::inbound::http::summary::dashboard_summary,
        crate::inbound::http::health::status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    tags(
        (name = "applications", description = "Citizen service applications"),
        (name = "accounts", description = "Registration, login, and verification"),
        (name = "notifications", description = "Broadcast notifications"),
        (name = "summary", description = "Admin dashboard aggregation"),
        (name = "health", description = "Probes and service status")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_endpoint_path() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for expected in [
            "/applications",
            "/signup",
            "/login",
            "/admin-login",
            "/users-pending",
            "/approve",
            "/notifications",
            "/summary",
            "/status",
            "/health/ready",
            "/health/live",
        ] {
            assert!(paths.contains_key(expected), "missing path {expected}");
        }
    }
}
