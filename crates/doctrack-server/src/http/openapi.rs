use aide::axum::{
    routing::{get, post},
    ApiRouter,
};
use aide::openapi::{Info, OpenApi};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use doctrack_core::api::auth::{TokenQuery, TokenResponse};
use doctrack_core::api::documents::{
    ExpiringDocumentsResponse, ExpiringQuery, ListDocumentsQuery, MessageResponse,
};
use doctrack_core::api::reminders::{ReminderCheckResponse, ReminderOutcome, ReminderStatus};
use doctrack_core::api::system::HealthResponse;
use doctrack_core::{Document, DocumentPatch, NewDocument};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::app::AppState;

/// Named so the generated document lists `sno` as the path parameter.
#[derive(Deserialize, JsonSchema)]
struct DocumentPath {
    #[allow(dead_code)]
    sno: i32,
}

pub fn build_openapi() -> OpenApi {
    let mut api = OpenApi {
        info: Info {
            title: "doctrack-server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            ..Default::default()
        },
        ..Default::default()
    };

    let _ = doc_router().finish_api(&mut api);
    api
}

fn doc_router() -> ApiRouter<AppState> {
    ApiRouter::new()
        .api_route("/health", get(health))
        .api_route("/auth/token", post(auth_token))
        .api_route("/documents/", get(documents_list).post(documents_create))
        .api_route(
            "/documents/:sno",
            get(documents_get)
                .put(documents_update)
                .delete(documents_delete),
        )
        .api_route("/documents/expiring/soon", get(documents_expiring))
        .api_route("/reminder/check", post(reminder_check))
}

fn not_implemented<T>(body: T) -> (StatusCode, Json<T>) {
    (StatusCode::NOT_IMPLEMENTED, Json(body))
}

fn placeholder_document() -> Document {
    let now = Utc::now();
    Document {
        sno: 0,
        document_type: String::new(),
        document_owner: String::new(),
        document_number: String::new(),
        expiry_date: NaiveDate::MIN,
        action_due_date: NaiveDate::MIN,
        created_at: now,
        updated_at: now,
    }
}

async fn health() -> (StatusCode, Json<HealthResponse>) {
    not_implemented(HealthResponse {
        status: "not_implemented".to_string(),
        timestamp: Utc::now(),
        version: "0.0.0".to_string(),
        uptime_seconds: 0,
    })
}

async fn auth_token(Query(_query): Query<TokenQuery>) -> (StatusCode, Json<TokenResponse>) {
    not_implemented(TokenResponse {
        access_token: String::new(),
        token_type: "bearer".to_string(),
        expires_in: 0,
    })
}

async fn documents_list(
    Query(_query): Query<ListDocumentsQuery>,
) -> (StatusCode, Json<Vec<Document>>) {
    not_implemented(Vec::new())
}

async fn documents_create(Json(_payload): Json<NewDocument>) -> (StatusCode, Json<Document>) {
    not_implemented(placeholder_document())
}

async fn documents_get(Path(_path): Path<DocumentPath>) -> (StatusCode, Json<Document>) {
    not_implemented(placeholder_document())
}

async fn documents_update(
    Path(_path): Path<DocumentPath>,
    Json(_payload): Json<DocumentPatch>,
) -> (StatusCode, Json<Document>) {
    not_implemented(placeholder_document())
}

async fn documents_delete(Path(_path): Path<DocumentPath>) -> (StatusCode, Json<MessageResponse>) {
    not_implemented(MessageResponse {
        message: String::new(),
    })
}

async fn documents_expiring(
    Query(_query): Query<ExpiringQuery>,
) -> (StatusCode, Json<ExpiringDocumentsResponse>) {
    not_implemented(ExpiringDocumentsResponse {
        expiring_documents: Vec::new(),
        count: 0,
        days_ahead: 0,
    })
}

async fn reminder_check() -> (StatusCode, Json<ReminderCheckResponse>) {
    not_implemented(ReminderCheckResponse {
        message: String::new(),
        outcome: ReminderOutcome::skipped(ReminderStatus::NoDocuments, 0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let api = build_openapi();
        let paths = api.paths.expect("paths");
        for path in [
            "/health",
            "/auth/token",
            "/documents/",
            "/documents/expiring/soon",
            "/reminder/check",
        ] {
            assert!(paths.paths.contains_key(path), "missing {path}");
        }
        assert!(
            paths.paths.contains_key("/documents/{sno}")
                || paths.paths.contains_key("/documents/:sno")
        );
    }
}
