use std::time::Duration;

use chrono::Utc;
use doctrack_core::{roles, Principal};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domains::errors::ServiceError;

/// Signing material shared by the token endpoint, the middleware and the CLI.
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub marker: String,
    pub ttl: Duration,
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("marker", &self.marker)
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) static_string: Option<String>,
    pub(crate) exp: i64,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
}

pub fn issue_token(
    secret: &str,
    marker: &str,
    username: &str,
    role: &str,
    ttl: Duration,
) -> Result<IssuedToken, ServiceError> {
    let ttl_seconds = i64::try_from(ttl.as_secs()).map_err(|_| ServiceError::Internal("token_ttl"))?;
    let claims = Claims {
        sub: Some(username.to_string()),
        role: Some(role.to_string()),
        static_string: Some(marker.to_string()),
        exp: Utc::now().timestamp().saturating_add(ttl_seconds),
    };
    let token = encode_claims(secret, &claims)?;
    Ok(IssuedToken {
        token,
        expires_in: ttl.as_secs(),
    })
}

pub(crate) fn encode_claims(secret: &str, claims: &Claims) -> Result<String, ServiceError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|err| {
        tracing::error!(event = "token_encode_failed", error = %err);
        ServiceError::Internal("token_encode_failed")
    })
}

pub fn verify_token(secret: &str, marker: &str, token: &str) -> Result<Principal, ServiceError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|err| match err.kind() {
        ErrorKind::ExpiredSignature => ServiceError::TokenExpired,
        _ => ServiceError::InvalidToken,
    })?;
    let claims = data.claims;
    if claims.static_string.as_deref() != Some(marker) {
        return Err(ServiceError::InvalidTokenMarker);
    }
    let username = claims
        .sub
        .filter(|value| !value.is_empty())
        .ok_or(ServiceError::InvalidToken)?;
    let role = claims
        .role
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| roles::USER.to_string());
    Ok(Principal { username, role })
}
