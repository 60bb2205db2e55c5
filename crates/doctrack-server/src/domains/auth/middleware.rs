use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::app::AppState;
use crate::domains::auth::tokens::verify_token;
use crate::domains::errors::ServiceError;
use crate::infra::metrics;

pub(crate) fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

pub async fn auth_middleware(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ServiceError> {
    let state = request
        .extensions()
        .get::<AppState>()
        .cloned()
        .ok_or(ServiceError::Internal("state_missing"))?;
    let token = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| {
            metrics::auth_failure("not_authenticated");
            ServiceError::NotAuthenticated
        })?;

    let principal = match verify_token(&state.tokens.secret, &state.tokens.marker, token) {
        Ok(principal) => principal,
        Err(err) => {
            metrics::auth_failure(err.code());
            tracing::warn!(event = "auth_failed", reason = %err, "Bearer token rejected");
            return Err(err);
        }
    };

    tracing::Span::current().record("user", principal.username.as_str());
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
