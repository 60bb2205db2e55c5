use chrono::{Days, NaiveDate, Utc};
use doctrack_core::api::auth::TokenResponse;
use doctrack_core::api::documents::{ExpiringDocumentsResponse, MessageResponse};
use doctrack_core::api::reminders::ReminderCheckResponse;
use doctrack_core::api::system::HealthResponse;
use doctrack_core::{Document, DocumentPatch, NewDocument};
use reqwest::Method;
use tracing::info;

use super::report::SmokeReport;
use crate::cli_args::*;
use crate::modules::auth::http::request_token;
use crate::modules::documents::http::{
    create_document, delete_document, expiring_documents, get_document, list_documents,
    update_document,
};
use crate::modules::reminders::http::trigger_reminder_check;
use crate::modules::system::http::{read_json, send_public};
use crate::modules::system::CommandContext;

/// Walks the API the way an operator would after a deploy: health, token,
/// document CRUD, the expiring window and a manual reminder check.
pub(crate) async fn handle_smoke(
    args: SmokeArgs,
    ctx: &mut CommandContext<'_>,
) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();
    let mut report = SmokeReport::default();
    info!(addr = %ctx.addr, username = %args.username, role = %args.role, "smoke run started");

    report.record("health", check_health(ctx).await, |health| {
        format!("{} (version {})", health.status, health.version)
    });

    let Some(token) = report.record(
        "token",
        issue_token(ctx, &args.username, &args.role).await,
        |token| format!("{} token, expires in {}s", token.token_type, token.expires_in),
    ) else {
        return report.finish();
    };
    ctx.access_token = Some(token.access_token);
    let ctx = &*ctx;

    let payload = smoke_document(today, Utc::now().timestamp());
    let created = report.record("create", create(ctx, &payload).await, |doc| {
        format!("sno {} ({})", doc.sno, doc.document_number)
    });

    report.record("list", list(ctx).await, |documents| {
        format!("{} document(s)", documents.len())
    });

    match created.as_ref() {
        Some(doc) => {
            report.record("get", get(ctx, doc.sno).await, |fetched| {
                format!("sno {} {}", fetched.sno, fetched.document_type)
            });
            let patch = smoke_patch(today);
            report.record("update", update(ctx, doc.sno, &patch).await, |updated| {
                format!("{} expires {}", updated.document_type, updated.expiry_date)
            });
        }
        None => {
            report.skip("get", "no document created");
            report.skip("update", "no document created");
        }
    }

    report.record("expiring", expiring(ctx, args.days).await, |expiring| {
        format!("{} document(s) within {} days", expiring.count, expiring.days_ahead)
    });

    report.record("reminder", remind(ctx).await, |response| {
        format!(
            "{} ({} recipient(s), {} delivered)",
            response.outcome.status.as_str(),
            response.outcome.recipients,
            response.outcome.delivered
        )
    });

    if args.cleanup {
        if let Some(doc) = created.as_ref() {
            report.record("cleanup", delete(ctx, doc.sno).await, |response| {
                response.message.clone()
            });
        }
    }

    report.finish()
}

pub(crate) fn smoke_document(today: NaiveDate, stamp: i64) -> NewDocument {
    NewDocument {
        document_type: "Smoke Test License".to_string(),
        document_owner: "Smoke Test Owner".to_string(),
        document_number: format!("SMOKE-{}-{stamp}", today.format("%Y%m%d")),
        expiry_date: today + Days::new(60),
        action_due_date: today + Days::new(45),
    }
}

pub(crate) fn smoke_patch(today: NaiveDate) -> DocumentPatch {
    DocumentPatch {
        document_type: Some("Updated Smoke Test License".to_string()),
        expiry_date: Some(today + Days::new(90)),
        ..DocumentPatch::default()
    }
}

async fn check_health(ctx: &CommandContext<'_>) -> anyhow::Result<HealthResponse> {
    let url = ctx.url("/health");
    read_json(send_public(ctx, Method::GET, &url, None).await?).await
}

async fn issue_token(
    ctx: &CommandContext<'_>,
    username: &str,
    role: &str,
) -> anyhow::Result<TokenResponse> {
    read_json(request_token(ctx, username, role).await?).await
}

async fn create(ctx: &CommandContext<'_>, payload: &NewDocument) -> anyhow::Result<Document> {
    read_json(create_document(ctx, payload).await?).await
}

async fn list(ctx: &CommandContext<'_>) -> anyhow::Result<Vec<Document>> {
    read_json(list_documents(ctx, None, None).await?).await
}

async fn get(ctx: &CommandContext<'_>, sno: i32) -> anyhow::Result<Document> {
    let document: Document = read_json(get_document(ctx, sno).await?).await?;
    if document.sno != sno {
        anyhow::bail!("asked for sno {sno}, got {}", document.sno);
    }
    Ok(document)
}

async fn update(
    ctx: &CommandContext<'_>,
    sno: i32,
    patch: &DocumentPatch,
) -> anyhow::Result<Document> {
    let document: Document = read_json(update_document(ctx, sno, patch).await?).await?;
    if patch.document_type.as_ref() != Some(&document.document_type) {
        anyhow::bail!("document_type not updated (got {})", document.document_type);
    }
    Ok(document)
}

async fn expiring(ctx: &CommandContext<'_>, days: i64) -> anyhow::Result<ExpiringDocumentsResponse> {
    read_json(expiring_documents(ctx, Some(days)).await?).await
}

async fn remind(ctx: &CommandContext<'_>) -> anyhow::Result<ReminderCheckResponse> {
    read_json(trigger_reminder_check(ctx).await?).await
}

async fn delete(ctx: &CommandContext<'_>, sno: i32) -> anyhow::Result<MessageResponse> {
    read_json(delete_document(ctx, sno).await?).await
}
