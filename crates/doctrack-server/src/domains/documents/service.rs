use chrono::NaiveDate;
use doctrack_core::api::documents::{ExpiringDocumentsResponse, ListDocumentsQuery};
use doctrack_core::{expiry_window, Document, DocumentPatch, NewDocument};
use doctrack_db::repo::{is_unique_violation, DocumentRepo};

use crate::app::AppState;
use crate::domains::errors::ServiceError;
use crate::infra::metrics;

const DOCUMENT_NOT_FOUND: ServiceError = ServiceError::NotFound("document_not_found");

fn db_error(operation: &'static str, err: &sqlx_core::Error) -> ServiceError {
    tracing::error!(event = "document_db_error", operation, error = %err);
    metrics::document_operation(operation, "error");
    ServiceError::DbError
}

/// Maps a write failure, treating a unique-key race as the duplicate-number case.
fn write_error(operation: &'static str, err: &sqlx_core::Error) -> ServiceError {
    if is_unique_violation(err) {
        metrics::document_operation(operation, "duplicate");
        return ServiceError::DUPLICATE_NUMBER;
    }
    db_error(operation, err)
}

pub async fn create_document(
    state: &AppState,
    document: NewDocument,
) -> Result<Document, ServiceError> {
    document.validate()?;
    let repo = DocumentRepo::new(&state.db);
    let existing = repo
        .get_by_number(&document.document_number)
        .await
        .map_err(|err| db_error("create", &err))?;
    if existing.is_some() {
        metrics::document_operation("create", "duplicate");
        return Err(ServiceError::DUPLICATE_NUMBER);
    }
    let created = repo
        .create(&document)
        .await
        .map_err(|err| write_error("create", &err))?;
    metrics::document_operation("create", "ok");
    tracing::info!(
        event = "document_created",
        sno = created.sno,
        document_number = %created.document_number
    );
    Ok(created)
}

pub async fn list_documents(
    state: &AppState,
    query: &ListDocumentsQuery,
) -> Result<Vec<Document>, ServiceError> {
    let (skip, limit) = query.page();
    let documents = DocumentRepo::new(&state.db)
        .list(skip, limit)
        .await
        .map_err(|err| db_error("list", &err))?;
    metrics::document_operation("list", "ok");
    Ok(documents)
}

pub async fn get_document(state: &AppState, sno: i32) -> Result<Document, ServiceError> {
    let document = DocumentRepo::new(&state.db)
        .get_by_sno(sno)
        .await
        .map_err(|err| db_error("get", &err))?;
    match document {
        Some(document) => {
            metrics::document_operation("get", "ok");
            Ok(document)
        }
        None => {
            metrics::document_operation("get", "not_found");
            Err(DOCUMENT_NOT_FOUND)
        }
    }
}

pub async fn update_document(
    state: &AppState,
    sno: i32,
    patch: DocumentPatch,
) -> Result<Document, ServiceError> {
    patch.validate()?;
    let repo = DocumentRepo::new(&state.db);
    let existing = repo
        .get_by_sno(sno)
        .await
        .map_err(|err| db_error("update", &err))?
        .ok_or_else(|| {
            metrics::document_operation("update", "not_found");
            DOCUMENT_NOT_FOUND
        })?;

    if let Some(number) = patch.document_number.as_deref() {
        if number != existing.document_number
            && repo
                .number_taken_by_other(number, sno)
                .await
                .map_err(|err| db_error("update", &err))?
        {
            metrics::document_operation("update", "duplicate");
            return Err(ServiceError::DUPLICATE_NUMBER);
        }
    }

    let updated = repo
        .update(sno, &patch)
        .await
        .map_err(|err| write_error("update", &err))?
        .ok_or_else(|| {
            metrics::document_operation("update", "not_found");
            DOCUMENT_NOT_FOUND
        })?;
    metrics::document_operation("update", "ok");
    tracing::info!(event = "document_updated", sno = updated.sno);
    Ok(updated)
}

pub async fn delete_document(state: &AppState, sno: i32) -> Result<(), ServiceError> {
    let deleted = DocumentRepo::new(&state.db)
        .delete(sno)
        .await
        .map_err(|err| db_error("delete", &err))?;
    if deleted == 0 {
        metrics::document_operation("delete", "not_found");
        return Err(DOCUMENT_NOT_FOUND);
    }
    metrics::document_operation("delete", "ok");
    tracing::info!(event = "document_deleted", sno);
    Ok(())
}

pub async fn expiring_documents(
    state: &AppState,
    today: NaiveDate,
    days: i64,
) -> Result<ExpiringDocumentsResponse, ServiceError> {
    let (from, to) = expiry_window(today, days).ok_or(ServiceError::INVALID_DAYS)?;
    let documents = DocumentRepo::new(&state.db)
        .list_expiring(from, to)
        .await
        .map_err(|err| db_error("expiring", &err))?;
    metrics::document_operation("expiring", "ok");
    Ok(ExpiringDocumentsResponse {
        count: documents.len(),
        expiring_documents: documents,
        days_ahead: days,
    })
}
