use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use doctrack_core::api::documents::{ExpiringQuery, ListDocumentsQuery, MessageResponse};
use doctrack_core::{DocumentPatch, NewDocument, ValidationError};

use crate::app::AppState;
use crate::domains::documents::service;
use crate::domains::errors::ServiceError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/documents", post(create_document).get(list_documents))
        .route("/documents/", post(create_document).get(list_documents))
        .route("/documents/expiring/soon", get(expiring_documents))
        .route(
            "/documents/:sno",
            get(get_document)
                .put(update_document)
                .delete(delete_document),
        )
}

fn invalid(field: &'static str) -> ServiceError {
    ServiceError::Validation(ValidationError {
        field,
        reason: "invalid",
    })
}

fn parse_sno(raw: &str) -> Result<i32, ServiceError> {
    raw.trim().parse::<i32>().map_err(|_| invalid("sno"))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ServiceError> {
    payload.map(|Json(value)| value).map_err(|err| {
        tracing::debug!(event = "document_body_rejected", error = %err);
        invalid("body")
    })
}

#[tracing::instrument(skip(state, payload))]
async fn create_document(
    State(state): State<AppState>,
    payload: Result<Json<NewDocument>, JsonRejection>,
) -> impl IntoResponse {
    let document = match body(payload) {
        Ok(document) => document,
        Err(err) => return err.into_response(),
    };
    match service::create_document(&state, document).await {
        Ok(created) => (StatusCode::OK, Json(created)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[tracing::instrument(skip(state, query))]
async fn list_documents(
    State(state): State<AppState>,
    query: Result<Query<ListDocumentsQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Ok(Query(query)) = query else {
        return invalid("query").into_response();
    };
    match service::list_documents(&state, &query).await {
        Ok(documents) => (StatusCode::OK, Json(documents)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[tracing::instrument(skip(state))]
async fn get_document(State(state): State<AppState>, Path(sno): Path<String>) -> impl IntoResponse {
    let sno = match parse_sno(&sno) {
        Ok(sno) => sno,
        Err(err) => return err.into_response(),
    };
    match service::get_document(&state, sno).await {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[tracing::instrument(skip(state, payload))]
async fn update_document(
    State(state): State<AppState>,
    Path(sno): Path<String>,
    payload: Result<Json<DocumentPatch>, JsonRejection>,
) -> impl IntoResponse {
    let sno = match parse_sno(&sno) {
        Ok(sno) => sno,
        Err(err) => return err.into_response(),
    };
    let patch = match body(payload) {
        Ok(patch) => patch,
        Err(err) => return err.into_response(),
    };
    match service::update_document(&state, sno, patch).await {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[tracing::instrument(skip(state))]
async fn delete_document(
    State(state): State<AppState>,
    Path(sno): Path<String>,
) -> impl IntoResponse {
    let sno = match parse_sno(&sno) {
        Ok(sno) => sno,
        Err(err) => return err.into_response(),
    };
    match service::delete_document(&state, sno).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Document deleted successfully".to_string(),
            }),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

#[tracing::instrument(skip(state, query))]
async fn expiring_documents(
    State(state): State<AppState>,
    query: Result<Query<ExpiringQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Ok(Query(query)) = query else {
        return invalid("days").into_response();
    };
    let today = Utc::now().date_naive();
    match service::expiring_documents(&state, today, query.days()).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => err.into_response(),
    }
}
