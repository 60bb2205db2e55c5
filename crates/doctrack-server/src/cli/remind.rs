use std::sync::Arc;

use chrono::Utc;
use clap::Args;
use doctrack_db::PgPool;

use crate::bootstrap;
use crate::domains::reminders::service;
use crate::infra::mailer::MemoryMailer;
use crate::settings::Settings;

#[derive(Debug, Clone, Args)]
pub struct RemindArgs {
    /// Print documents and recipients without sending mail
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn run(settings: &Settings, db: &PgPool, args: &RemindArgs) -> Result<(), String> {
    let today = Utc::now().date_naive();
    if args.dry_run {
        let state =
            bootstrap::build_state_with_mailer(settings, db.clone(), Arc::new(MemoryMailer::new()));
        let plan = service::plan_reminder(&state, today)
            .await
            .map_err(|err| format!("reminder plan failed: {err}"))?;
        let json = serde_json::to_string_pretty(&plan)
            .map_err(|err| format!("output encode failed: {err}"))?;
        println!("{json}");
        return Ok(());
    }

    let state = bootstrap::build_state(settings, db.clone());
    let outcome = service::run_reminder_check(&state, today, "cli")
        .await
        .map_err(|err| format!("reminder check failed: {err}"))?;
    let json = serde_json::to_string_pretty(&outcome)
        .map_err(|err| format!("output encode failed: {err}"))?;
    println!("{json}");
    Ok(())
}
