use std::collections::HashSet;

use chrono::NaiveDate;
use doctrack_core::api::reminders::{ReminderOutcome, ReminderStatus};
use doctrack_core::{expiry_window, roles, Document};
use doctrack_db::repo::{DocumentRepo, UserRepo};
use serde::Serialize;

use crate::app::AppState;
use crate::domains::errors::ServiceError;
use crate::domains::reminders::email::{render_reminder_html, REMINDER_SUBJECT};
use crate::infra::mailer::{Mailer, OutgoingEmail};
use crate::infra::metrics;

/// Documents and recipients a reminder run would use, before any mail is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderPlan {
    pub window_from: NaiveDate,
    pub window_to: NaiveDate,
    pub documents: Vec<Document>,
    pub recipients: Vec<String>,
}

/// Distinct non-empty addresses in first-seen order; `fallback` is used only
/// when no user address survives.
pub fn resolve_recipients<I>(emails: I, fallback: Option<&str>) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let mut recipients = Vec::new();
    for email in emails {
        let email = email.trim().to_string();
        if email.is_empty() {
            continue;
        }
        if seen.insert(email.to_ascii_lowercase()) {
            recipients.push(email);
        }
    }
    if recipients.is_empty() {
        if let Some(fallback) = fallback.map(str::trim).filter(|value| !value.is_empty()) {
            recipients.push(fallback.to_string());
        }
    }
    recipients
}

pub async fn plan_reminder(state: &AppState, today: NaiveDate) -> Result<ReminderPlan, ServiceError> {
    let window_days = state.config.reminders.window_days;
    let (window_from, window_to) =
        expiry_window(today, window_days).ok_or(ServiceError::INVALID_DAYS)?;
    let documents = DocumentRepo::new(&state.db)
        .list_expiring(window_from, window_to)
        .await
        .map_err(|err| {
            tracing::error!(event = "reminder_db_error", step = "documents", error = %err);
            ServiceError::DbError
        })?;
    let recipients = if documents.is_empty() {
        Vec::new()
    } else {
        let users = UserRepo::new(&state.db)
            .list_by_roles(&roles::REMINDER_ROLES)
            .await
            .map_err(|err| {
                tracing::error!(event = "reminder_db_error", step = "recipients", error = %err);
                ServiceError::DbError
            })?;
        resolve_recipients(
            users.into_iter().map(|user| user.email),
            state.config.reminders.admin_email.as_deref(),
        )
    };
    Ok(ReminderPlan {
        window_from,
        window_to,
        documents,
        recipients,
    })
}

/// Sends one message per recipient; a failed recipient does not stop the rest.
pub async fn deliver_plan(
    mailer: &dyn Mailer,
    plan: &ReminderPlan,
    window_days: i64,
) -> ReminderOutcome {
    if plan.documents.is_empty() {
        return ReminderOutcome::skipped(ReminderStatus::NoDocuments, 0);
    }
    if plan.recipients.is_empty() {
        tracing::warn!(
            event = "reminder_no_recipients",
            documents = plan.documents.len()
        );
        return ReminderOutcome::skipped(ReminderStatus::NoRecipients, plan.documents.len());
    }

    let html_body = render_reminder_html(&plan.documents, window_days);
    let mut delivered = 0;
    let mut failed = 0;
    for recipient in &plan.recipients {
        let email = OutgoingEmail {
            to: recipient.clone(),
            subject: REMINDER_SUBJECT.to_string(),
            html_body: html_body.clone(),
        };
        match mailer.send(&email).await {
            Ok(()) => {
                delivered += 1;
                metrics::reminder_email("sent");
                tracing::info!(event = "reminder_email_sent", recipient = %recipient);
            }
            Err(err) => {
                failed += 1;
                metrics::reminder_email("failed");
                tracing::warn!(
                    event = "reminder_email_failed",
                    recipient = %recipient,
                    mailer = mailer.kind(),
                    error = %err
                );
            }
        }
    }
    ReminderOutcome::delivery(plan.documents.len(), delivered, failed)
}

/// Runs one reminder check. Concurrent runs are serialized so the scheduler and
/// a manual trigger never mail the same digest twice at once.
pub async fn run_reminder_check(
    state: &AppState,
    today: NaiveDate,
    trigger: &'static str,
) -> Result<ReminderOutcome, ServiceError> {
    let _guard = state.reminder_lock.lock().await;
    tracing::info!(event = "reminder_check_started", trigger, %today);

    let plan = match plan_reminder(state, today).await {
        Ok(plan) => plan,
        Err(err) => {
            metrics::reminder_run(trigger, "error");
            return Err(err);
        }
    };
    let outcome = deliver_plan(
        state.mailer.as_ref(),
        &plan,
        state.config.reminders.window_days,
    )
    .await;

    metrics::reminder_run(trigger, outcome.status.as_str());
    tracing::info!(
        event = "reminder_check_completed",
        trigger,
        status = outcome.status.as_str(),
        documents = outcome.documents,
        recipients = outcome.recipients,
        delivered = outcome.delivered,
        failed = outcome.failed
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::mailer::MemoryMailer;
    use chrono::Utc;

    fn plan(documents: usize, recipients: &[&str]) -> ReminderPlan {
        let now = Utc::now();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).expect("date");
        ReminderPlan {
            window_from: today,
            window_to: today,
            documents: (0..documents)
                .map(|idx| Document {
                    sno: idx as i32 + 1,
                    document_type: "Passport".to_string(),
                    document_owner: "John".to_string(),
                    document_number: format!("P-{idx}"),
                    expiry_date: today,
                    action_due_date: today,
                    created_at: now,
                    updated_at: now,
                })
                .collect(),
            recipients: recipients.iter().map(|value| (*value).to_string()).collect(),
        }
    }

    #[test]
    fn recipients_are_deduplicated() {
        let recipients = resolve_recipients(
            vec![
                "admin@example.com".to_string(),
                " ".to_string(),
                "ADMIN@example.com".to_string(),
                "owner@example.com".to_string(),
            ],
            Some("fallback@example.com"),
        );
        assert_eq!(recipients, vec!["admin@example.com", "owner@example.com"]);
    }

    #[test]
    fn fallback_used_only_without_users() {
        assert_eq!(
            resolve_recipients(Vec::new(), Some("fallback@example.com")),
            vec!["fallback@example.com"]
        );
        assert!(resolve_recipients(Vec::new(), Some("  ")).is_empty());
        assert!(resolve_recipients(Vec::new(), None).is_empty());
    }

    #[tokio::test]
    async fn no_documents_sends_nothing() {
        let mailer = MemoryMailer::new();
        let outcome = deliver_plan(&mailer, &plan(0, &["admin@example.com"]), 30).await;
        assert_eq!(outcome.status, ReminderStatus::NoDocuments);
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn no_recipients_is_reported() {
        let mailer = MemoryMailer::new();
        let outcome = deliver_plan(&mailer, &plan(2, &[]), 30).await;
        assert_eq!(outcome.status, ReminderStatus::NoRecipients);
        assert_eq!(outcome.documents, 2);
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn one_message_per_recipient() {
        let mailer = MemoryMailer::new();
        let outcome = deliver_plan(
            &mailer,
            &plan(2, &["admin@example.com", "owner@example.com"]),
            30,
        )
        .await;
        assert_eq!(outcome.status, ReminderStatus::Sent);
        assert_eq!(outcome.delivered, 2);
        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].subject, REMINDER_SUBJECT);
        assert_eq!(sent[1].to, "owner@example.com");
        assert_eq!(sent[0].html_body.matches("<tr><td>").count(), 2);
    }

    #[tokio::test]
    async fn failed_recipient_does_not_stop_others() {
        let mailer = MemoryMailer::rejecting(["admin@example.com"]);
        let outcome = deliver_plan(
            &mailer,
            &plan(1, &["admin@example.com", "owner@example.com"]),
            30,
        )
        .await;
        assert_eq!(outcome.status, ReminderStatus::PartiallySent);
        assert_eq!((outcome.delivered, outcome.failed), (1, 1));
        assert_eq!(mailer.sent().len(), 1);

        let mailer = MemoryMailer::rejecting(["owner@example.com"]);
        let outcome = deliver_plan(&mailer, &plan(1, &["owner@example.com"]), 30).await;
        assert_eq!(outcome.status, ReminderStatus::DeliveryFailed);
    }
}
