//! Health and status endpoints.
//!
//! `/health/live` and `/health/ready` are plain probes for orchestration
//! and load balancers. `/status` is the human-facing variant the portal's
//! landing page polls: process state plus storage connectivity.

use actix_web::{get, http::header, web, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use utoipa::ToSchema;

use crate::inbound::http::state::HttpState;

/// Shared health state for readiness and liveness checks.
#[derive(Debug)]
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Create a new health state starting as not ready but live.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Flag the service as unhealthy so liveness checks fail fast during
    /// shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Return readiness state.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Return liveness state.
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn probe_response(probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };

        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Storage connectivity block inside [`StatusResponse`].
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StorageStatusBlock {
    /// Whether the probe query succeeded.
    pub connected: bool,
    /// `connected` or `disconnected`, for display.
    pub status: String,
}

/// Success envelope for `GET /status`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    /// Always `success`; the process answered.
    pub status: String,
    /// Human-readable state.
    pub message: String,
    /// Storage connectivity.
    pub database: StorageStatusBlock,
    /// Server time in RFC 3339.
    pub timestamp: String,
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_ready())
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Server process is healthy"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_alive())
}

/// Service status with storage connectivity.
#[utoipa::path(
    get,
    path = "/status",
    tags = ["health"],
    responses(
        (status = 200, description = "Server status", body = StatusResponse)
    )
)]
#[get("/status")]
pub async fn status(state: web::Data<HttpState>) -> web::Json<StatusResponse> {
    let connected = state.storage.ping().await;
    web::Json(StatusResponse {
        status: "success".to_owned(),
        message: "Server is running".to_owned(),
        database: StorageStatusBlock {
            connected,
            status: if connected {
                "connected".to_owned()
            } else {
                "disconnected".to_owned()
            },
        },
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_state_starts_live_but_not_ready() {
        let state = HealthState::new();
        assert!(state.is_alive());
        assert!(!state.is_ready());
    }

    #[test]
    fn mark_ready_and_unhealthy_flip_the_probes() {
        let state = HealthState::new();
        state.mark_ready();
        assert!(state.is_ready());
        state.mark_unhealthy();
        assert!(!state.is_alive());
    }
}
