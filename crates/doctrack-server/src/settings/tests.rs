use super::*;
use crate::config::{MetricsProfile, SmtpSecurity};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());
static CONFIG_SEQ: AtomicU32 = AtomicU32::new(0);

const ALL_VARS: &[&str] = &[
    "DOCTRACK_ADDR",
    "PORT",
    "DATABASE_URL",
    "DOCTRACK_DB_POOL_MAX",
    "DOCTRACK_CONFIG_PATH",
    "JWT_SECRET",
    "JWT_SECRET_FILE",
    "DOCTRACK_TOKEN_TTL_HOURS",
    "DOCTRACK_TOKEN_MARKER",
    "DOCTRACK_TOKEN_ENDPOINT_ENABLED",
    "SMTP_SERVER",
    "SMTP_PORT",
    "SMTP_USERNAME",
    "SMTP_PASSWORD",
    "SMTP_PASSWORD_FILE",
    "SMTP_SECURITY",
    "SMTP_FROM",
    "ADMIN_EMAIL",
    "DOCTRACK_REMINDERS_ENABLED",
    "DOCTRACK_REMINDER_SCHEDULE",
    "DOCTRACK_REMINDER_WINDOW_DAYS",
    "DOCTRACK_METRICS_ENABLED",
    "DOCTRACK_METRICS_ENDPOINT",
    "DOCTRACK_METRICS_PROFILE",
    "DOCTRACK_ENV",
    "DOCTRACK_ALLOW_METRICS_DEBUG",
    "DOCTRACK_TRACING_OTEL_ENABLED",
    "OTEL_EXPORTER_OTLP_ENDPOINT",
    "OTEL_SERVICE_NAME",
    "SENTRY_DSN",
];

fn clear_env() {
    for name in ALL_VARS {
        env::remove_var(name);
    }
    // Point at a file that never exists so a developer's config.yaml is ignored.
    env::set_var("DOCTRACK_CONFIG_PATH", temp_path("missing"));
}

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "doctrack-test-{label}-{}-{}.yaml",
        std::process::id(),
        CONFIG_SEQ.fetch_add(1, Ordering::SeqCst)
    ))
}

fn set_config(yaml: &str) {
    let path = temp_path("config");
    std::fs::write(&path, yaml).expect("write config");
    env::set_var("DOCTRACK_CONFIG_PATH", path);
}

#[test]
fn defaults_without_env() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();

    let settings = Settings::from_env();
    assert_eq!(settings.addr, "0.0.0.0:8000".parse().expect("addr"));
    assert_eq!(settings.db_pool_max, 10);
    assert!(settings.jwt_secret.is_empty());
    assert_eq!(settings.config.auth.token_ttl_hours, 24);
    assert_eq!(settings.config.auth.token_marker, "alphabeta");
    assert_eq!(settings.config.reminders.schedule, "0 0 9 * * *");
    assert_eq!(settings.config.reminders.window_days, 30);
    assert_eq!(settings.config.smtp.server, "smtp.gmail.com");
    assert_eq!(settings.config.smtp.effective_port(), 587);
}

#[test]
fn port_env_binds_all_interfaces() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    env::set_var("PORT", "10000");

    let settings = Settings::from_env();
    assert_eq!(settings.addr, "0.0.0.0:10000".parse().expect("addr"));

    env::remove_var("PORT");
    env::set_var("DOCTRACK_ADDR", "127.0.0.1:9000");
    let settings = Settings::from_env();
    assert_eq!(settings.addr, "127.0.0.1:9000".parse().expect("addr"));
}

#[test]
fn platform_port_overrides_container_addr() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    env::set_var("DOCTRACK_ADDR", "0.0.0.0:8000");
    env::set_var("PORT", "10000");

    let settings = Settings::from_env();
    assert_eq!(settings.addr, "0.0.0.0:10000".parse().expect("addr"));

    env::set_var("PORT", "not-a-port");
    let settings = Settings::from_env();
    assert_eq!(settings.addr, "0.0.0.0:8000".parse().expect("addr"));
}

#[test]
fn parse_bool_accepts_common_spellings() {
    assert_eq!(parse_bool(" Yes "), Some(true));
    assert_eq!(parse_bool("on"), Some(true));
    assert_eq!(parse_bool("0"), Some(false));
    assert_eq!(parse_bool("OFF"), Some(false));
    assert_eq!(parse_bool("maybe"), None);
}

#[test]
fn database_url_is_normalized() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    env::set_var(
        "DATABASE_URL",
        "psql 'postgresql://app:pw@db.example.com/app?sslmode=require&channel_binding=require'",
    );

    let settings = Settings::from_env();
    assert_eq!(
        settings.db_url,
        "postgresql://app:pw@db.example.com/app?sslmode=require"
    );
}

#[test]
fn missing_jwt_secret_fails_preflight() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();

    let settings = Settings::from_env();
    let missing = preflight(&settings).expect_err("preflight should fail");
    assert!(missing.iter().any(|value| value.contains("JWT_SECRET")));

    let settings = Settings::from_env_with_options(false);
    assert!(preflight(&settings).is_ok());
}

#[test]
fn jwt_secret_can_come_from_file() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    let path = temp_path("secret");
    std::fs::write(&path, "file-secret\n").expect("write secret");
    env::set_var("JWT_SECRET_FILE", &path);

    let settings = Settings::from_env();
    assert_eq!(settings.jwt_secret, "file-secret");
    assert!(preflight(&settings).is_ok());
}

#[test]
fn smtp_and_reminder_env_overrides_apply() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    env::set_var("JWT_SECRET", "secret");
    env::set_var("SMTP_SERVER", "mail.example.com");
    env::set_var("SMTP_PORT", "2525");
    env::set_var("SMTP_USERNAME", "mailer@example.com");
    env::set_var("SMTP_PASSWORD", "app-password");
    env::set_var("SMTP_SECURITY", "none");
    env::set_var("ADMIN_EMAIL", "admin@example.com");
    env::set_var("DOCTRACK_REMINDERS_ENABLED", "false");
    env::set_var("DOCTRACK_REMINDER_WINDOW_DAYS", "14");

    let settings = Settings::from_env();
    let smtp = &settings.config.smtp;
    assert_eq!(smtp.server, "mail.example.com");
    assert_eq!(smtp.effective_port(), 2525);
    assert_eq!(smtp.username, "mailer@example.com");
    assert_eq!(smtp.password.as_deref(), Some("app-password"));
    assert_eq!(smtp.security, SmtpSecurity::None);
    assert!(!settings.config.reminders.enabled);
    assert_eq!(settings.config.reminders.window_days, 14);
    assert_eq!(
        settings.config.reminders.admin_email.as_deref(),
        Some("admin@example.com")
    );
}

#[test]
fn yaml_config_is_loaded_then_overridden() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    set_config(
        r#"auth:
  token_ttl_hours: 2
  token_marker: gamma
reminders:
  schedule: "0 30 8 * * Mon-Fri"
  window_days: 7
"#,
    );
    env::set_var("DOCTRACK_TOKEN_TTL_HOURS", "6");

    let settings = Settings::from_env();
    assert_eq!(settings.config.auth.token_ttl_hours, 6);
    assert_eq!(settings.config.auth.token_marker, "gamma");
    assert_eq!(settings.config.reminders.schedule, "0 30 8 * * Mon-Fri");
    assert_eq!(settings.config.reminders.window_days, 7);
}

#[test]
fn invalid_schedule_fails_preflight() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    env::set_var("JWT_SECRET", "secret");
    env::set_var("DOCTRACK_REMINDER_SCHEDULE", "every morning");

    let settings = Settings::from_env();
    let missing = preflight(&settings).expect_err("preflight should fail");
    assert!(missing
        .iter()
        .any(|value| value.contains("reminders.schedule")));

    env::set_var("DOCTRACK_REMINDERS_ENABLED", "false");
    let settings = Settings::from_env();
    assert!(preflight(&settings).is_ok());
}

#[test]
fn negative_window_fails_preflight() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    env::set_var("JWT_SECRET", "secret");
    env::set_var("DOCTRACK_REMINDER_WINDOW_DAYS", "-3");

    let settings = Settings::from_env();
    let missing = preflight(&settings).expect_err("preflight should fail");
    assert!(missing.iter().any(|value| value.contains("window_days")));
}

#[test]
fn metrics_profile_rules() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    env::set_var("JWT_SECRET", "secret");
    env::set_var("DOCTRACK_METRICS_ENABLED", "true");

    let settings = Settings::from_env();
    let missing = preflight(&settings).expect_err("profile required");
    assert!(missing.iter().any(|value| value.contains("metrics.profile")));

    env::set_var("DOCTRACK_METRICS_PROFILE", "debug");
    let settings = Settings::from_env();
    assert_eq!(settings.config.metrics.profile, Some(MetricsProfile::Debug));
    assert!(preflight(&settings).is_err());

    env::set_var("DOCTRACK_ALLOW_METRICS_DEBUG", "true");
    let settings = Settings::from_env();
    assert!(preflight(&settings).is_ok());

    env::set_var("DOCTRACK_METRICS_PROFILE", "prod");
    env::set_var("DOCTRACK_ENV", "production");
    let settings = Settings::from_env();
    assert!(preflight(&settings).is_ok());
}

#[test]
fn invalid_values_fall_back_to_defaults() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    env::set_var("DOCTRACK_DB_POOL_MAX", "lots");
    env::set_var("DOCTRACK_TOKEN_TTL_HOURS", "0");
    env::set_var("SMTP_SECURITY", "carrier-pigeon");
    env::set_var("DOCTRACK_ADDR", "not-an-addr");

    let settings = Settings::from_env();
    assert_eq!(settings.db_pool_max, 10);
    assert_eq!(settings.config.auth.token_ttl_hours, 24);
    assert_eq!(settings.config.smtp.security, SmtpSecurity::Starttls);
    assert_eq!(settings.addr, "0.0.0.0:8000".parse().expect("addr"));
}
