use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use doctrack_core::api::auth::{TokenQuery, TokenResponse};
use doctrack_core::ValidationError;

use crate::app::AppState;
use crate::domains::auth::tokens::issue_token;
use crate::domains::errors::ServiceError;
use crate::infra::metrics;

pub fn router() -> Router<AppState> {
    Router::new().route("/auth/token", post(create_token))
}

#[tracing::instrument(skip(state, query), fields(username, role))]
async fn create_token(
    State(state): State<AppState>,
    query: Result<Query<TokenQuery>, QueryRejection>,
) -> impl IntoResponse {
    if !state.config.auth.token_endpoint_enabled {
        return ServiceError::NotFound("not_found").into_response();
    }
    let query = match query {
        Ok(Query(query)) if !query.username.trim().is_empty() => query,
        Ok(_) => return username_error("required").into_response(),
        Err(err) => {
            tracing::debug!(event = "token_query_rejected", error = %err);
            return username_error("invalid").into_response();
        }
    };
    tracing::Span::current()
        .record("username", query.username.as_str())
        .record("role", query.role.as_str());

    match issue_token(
        &state.tokens.secret,
        &state.tokens.marker,
        &query.username,
        &query.role,
        state.tokens.ttl,
    ) {
        Ok(issued) => {
            metrics::tokens_issued("api");
            tracing::info!(event = "token_issued", source = "api");
            (
                StatusCode::OK,
                Json(TokenResponse {
                    access_token: issued.token,
                    token_type: "bearer".to_string(),
                    expires_in: issued.expires_in,
                }),
            )
                .into_response()
        }
        Err(err) => err.into_response(),
    }
}

fn username_error(reason: &'static str) -> ServiceError {
    ServiceError::from(ValidationError {
        field: "username",
        reason,
    })
}
