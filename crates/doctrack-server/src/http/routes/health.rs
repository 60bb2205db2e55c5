use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::Utc;
use doctrack_core::api::system::HealthResponse;

use crate::app::AppState;
use crate::http::openapi;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/openapi.json", get(openapi_json))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let uptime_seconds = state.started_at.elapsed().as_secs();
    let (status, label) = match doctrack_db::ping(&state.db).await {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(err) => {
            tracing::warn!(event = "health_db_failed", error = %err);
            (StatusCode::SERVICE_UNAVAILABLE, "db_error")
        }
    };
    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds,
        }),
    )
}

async fn openapi_json() -> impl IntoResponse {
    Json(openapi::build_openapi())
}
