use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use cron::Schedule;

use crate::app::AppState;
use crate::domains::reminders::service;

pub fn parse_schedule(expression: &str) -> Result<Schedule, String> {
    Schedule::from_str(expression.trim()).map_err(|err| err.to_string())
}

/// Next run strictly after `now`, in UTC.
pub fn next_run(schedule: &Schedule, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    schedule.after(&now).next()
}

pub fn start_reminder_scheduler(state: AppState, schedule: Schedule) {
    tokio::spawn(async move {
        loop {
            let now = Utc::now();
            let Some(next) = next_run(&schedule, now) else {
                tracing::warn!(event = "reminder_schedule_exhausted");
                return;
            };
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            tracing::info!(
                event = "reminder_scheduled",
                next_run = %next.to_rfc3339(),
                wait_seconds = wait.as_secs()
            );
            tokio::time::sleep(wait).await;

            let today = Utc::now().date_naive();
            match service::run_reminder_check(&state, today, "schedule").await {
                Ok(outcome) => {
                    tracing::info!(
                        event = "reminder_scheduled_run_completed",
                        status = outcome.status.as_str(),
                        documents = outcome.documents,
                        delivered = outcome.delivered,
                        failed = outcome.failed
                    );
                }
                Err(err) => {
                    tracing::error!(event = "reminder_scheduled_run_failed", error = %err);
                }
            }
        }
    });
}
