use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::post, Extension, Json,
    Router,
};
use chrono::Utc;
use doctrack_core::api::reminders::ReminderCheckResponse;
use doctrack_core::Principal;

use crate::app::AppState;
use crate::domains::errors::ServiceError;
use crate::domains::reminders::service;

pub fn router() -> Router<AppState> {
    Router::new().route("/reminder/check", post(trigger_reminder_check))
}

#[tracing::instrument(skip(state, principal), fields(user = %principal.username, role = %principal.role))]
async fn trigger_reminder_check(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> impl IntoResponse {
    if !principal.can_trigger_reminders() {
        tracing::warn!(event = "reminder_check_forbidden", role = %principal.role);
        return ServiceError::Forbidden("Only admin or owner can trigger manual reminder check")
            .into_response();
    }
    let today = Utc::now().date_naive();
    match service::run_reminder_check(&state, today, "manual").await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(ReminderCheckResponse {
                message: "Reminder check completed".to_string(),
                outcome,
            }),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}
