use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use doctrack_core::api::system::ErrorResponse;
use doctrack_core::ValidationError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("not_authenticated")]
    NotAuthenticated,
    #[error("token_expired")]
    TokenExpired,
    #[error("invalid_token")]
    InvalidToken,
    #[error("invalid_token_marker")]
    InvalidTokenMarker,
    #[error("forbidden: {0}")]
    Forbidden(&'static str),
    #[error("bad_request: {code}")]
    BadRequest {
        code: &'static str,
        detail: &'static str,
    },
    #[error("validation_failed: {0}")]
    Validation(ValidationError),
    #[error("not_found: {0}")]
    NotFound(&'static str),
    #[error("db_error")]
    DbError,
    #[error("internal: {0}")]
    Internal(&'static str),
}

impl ServiceError {
    pub const DUPLICATE_NUMBER: Self = Self::BadRequest {
        code: "document_number_exists",
        detail: "Document number already exists",
    };
    pub const INVALID_DAYS: Self = Self::BadRequest {
        code: "invalid_days",
        detail: "days must be zero or greater",
    };

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotAuthenticated
            | Self::TokenExpired
            | Self::InvalidToken
            | Self::InvalidTokenMarker => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::DbError | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "not_authenticated",
            Self::TokenExpired => "token_expired",
            Self::InvalidToken => "invalid_token",
            Self::InvalidTokenMarker => "invalid_token_marker",
            Self::Forbidden(_) => "forbidden",
            Self::BadRequest { code, .. } => code,
            Self::Validation(_) => "validation_failed",
            Self::NotFound(code) => code,
            Self::DbError => "db_error",
            Self::Internal(code) => code,
        }
    }

    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::NotAuthenticated => "Not authenticated".to_string(),
            Self::TokenExpired => "Token has expired".to_string(),
            Self::InvalidToken => "Invalid token".to_string(),
            Self::InvalidTokenMarker => {
                "Invalid token - missing required static string".to_string()
            }
            Self::Forbidden(detail) => (*detail).to_string(),
            Self::BadRequest { detail, .. } => (*detail).to_string(),
            Self::Validation(err) => err.to_string(),
            Self::NotFound("document_not_found") => "Document not found".to_string(),
            Self::NotFound(_) => "Not found".to_string(),
            Self::DbError => "Database error".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.code().to_string(),
            detail: self.detail(),
        };
        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}
