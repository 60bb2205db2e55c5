#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cognitive_complexity)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_raw_string_hashes)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::or_fun_call)]
#![allow(clippy::ref_option)]
#![allow(clippy::single_match_else)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::unnecessary_wraps)]

use doctrack_db::{migrate, ping, redact_database_url, table_counts};

mod app;
mod bootstrap;
mod cli;
mod config;
mod domains;
mod http;
mod infra;
mod runtime;
mod settings;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let run_mode = cli::parse_args();
    if let cli::RunMode::OpenApi { out } = run_mode.clone() {
        let spec = http::openapi::build_openapi();
        let json = serde_json::to_string_pretty(&spec).expect("openapi json");
        if let Some(path) = out {
            if let Err(err) = std::fs::write(&path, json) {
                eprintln!("failed to write openapi spec: {err}");
                std::process::exit(1);
            }
        } else {
            println!("{json}");
        }
        return;
    }
    let settings = settings::Settings::from_env_with_options(run_mode.requires_secret());
    let sentry_guard = bootstrap::init_sentry(&settings);
    let sentry_enabled = sentry_guard.is_some();
    let otel_guard = bootstrap::init_tracing(sentry_enabled, &settings);
    let metrics_config = settings.config.metrics.clone();
    if run_mode.requires_secret() {
        if let Err(missing) = settings::preflight(&settings) {
            tracing::error!(
                event = "preflight_failed",
                missing = ?missing,
                "Required configuration missing"
            );
            std::process::exit(1);
        }
    }
    if matches!(run_mode, cli::RunMode::Server) {
        bootstrap::log_startup(&settings, &metrics_config);
        bootstrap::init_metrics_registry(&metrics_config);
    }

    tracing::info!(
        event = "db_connecting",
        database = %redact_database_url(&settings.db_url)
    );
    let db = match bootstrap::connect_db(&settings).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!(event = "db_connect_failed", error = %err);
            std::process::exit(1);
        }
    };

    let result = match run_mode {
        cli::RunMode::Migrate => run_migrate(&db).await,
        cli::RunMode::Seed => cli::seed::run(&db).await,
        cli::RunMode::Token(args) => cli::token::run(&settings, &args),
        cli::RunMode::User(args) => cli::users::run(&db, &args).await,
        cli::RunMode::Remind(args) => cli::remind::run(&settings, &db, &args).await,
        cli::RunMode::OpenApi { .. } => Ok(()),
        cli::RunMode::Server => {
            let state = bootstrap::build_state(&settings, db);
            bootstrap::start_background_tasks(&settings, &state);
            let app = bootstrap::build_app(&metrics_config, state);
            bootstrap::serve(&settings, app).await
        }
    };
    if let Err(err) = result {
        eprintln!("{err}");
        std::process::exit(1);
    }

    drop(otel_guard);
    drop(sentry_guard);
}

async fn run_migrate(db: &doctrack_db::PgPool) -> Result<(), String> {
    ping(db)
        .await
        .map_err(|err| format!("database unreachable: {err}"))?;
    migrate(db)
        .await
        .map_err(|err| format!("migration failed: {err}"))?;
    let counts = table_counts(db)
        .await
        .map_err(|err| format!("table count failed: {err}"))?;
    tracing::info!(
        event = "migrations_applied",
        documents = counts.documents,
        users = counts.users
    );
    println!(
        "migrations applied: documents={} users={}",
        counts.documents, counts.users
    );
    Ok(())
}
