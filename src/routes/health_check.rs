use axum::{http::StatusCode, routing::get, Router};

use crate::setup::AppState;

pub static HEALTH_CHECK_TAG: &str = "health check";

pub fn route() -> Router<AppState> {
    Router::new()
        .route("/live", get(live))
        .route("/health", get(health))
}

/// Cheapest possible liveness probe
#[utoipa::path(get, path = "/live", tag = HEALTH_CHECK_TAG, responses((status = 200, description = "OK")))]
pub async fn live() -> StatusCode {
    StatusCode::OK
}

/// Used to determine whether the API is online
#[utoipa::path(get, path = "/health", tag = HEALTH_CHECK_TAG, responses((status = 200, description = "OK")))]
pub async fn health() -> StatusCode {
    StatusCode::OK
}
