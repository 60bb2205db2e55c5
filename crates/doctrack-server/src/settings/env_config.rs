use std::env;
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::config::{MetricsProfile, ServerConfig, SmtpSecurity};

pub(super) fn load_config(path: &str) -> ServerConfig {
    if !Path::new(path).exists() {
        return ServerConfig::default();
    }

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            warn!(event = "config_read_failed", path, error = %err);
            return ServerConfig::default();
        }
    };
    match serde_yaml::from_str(&contents) {
        Ok(config) => config,
        Err(err) => {
            warn!(event = "config_parse_failed", path, error = %err);
            ServerConfig::default()
        }
    }
}

pub(super) fn apply_auth_env_overrides(config: &mut ServerConfig) {
    if let Ok(value) = env::var("DOCTRACK_TOKEN_TTL_HOURS") {
        match value.trim().parse::<u64>() {
            Ok(hours) if hours > 0 => config.auth.token_ttl_hours = hours,
            _ => warn!(event = "config_invalid", field = "DOCTRACK_TOKEN_TTL_HOURS", value = %value),
        }
    }
    if let Ok(value) = env::var("DOCTRACK_TOKEN_MARKER") {
        if value.trim().is_empty() {
            warn!(event = "config_invalid", field = "DOCTRACK_TOKEN_MARKER", value = %value);
        } else {
            config.auth.token_marker = value;
        }
    }
    if let Ok(value) = env::var("DOCTRACK_TOKEN_ENDPOINT_ENABLED") {
        if let Some(enabled) = parse_bool(&value) {
            config.auth.token_endpoint_enabled = enabled;
        } else {
            warn!(
                event = "config_invalid",
                field = "DOCTRACK_TOKEN_ENDPOINT_ENABLED",
                value = %value
            );
        }
    }
}

pub(super) fn apply_smtp_env_overrides(config: &mut ServerConfig) {
    if let Ok(value) = env::var("SMTP_SERVER") {
        if !value.trim().is_empty() {
            config.smtp.server = value.trim().to_string();
        }
    }
    if let Ok(value) = env::var("SMTP_PORT") {
        match value.trim().parse::<u16>() {
            Ok(port) => config.smtp.port = Some(port),
            Err(_) => warn!(event = "config_invalid", field = "SMTP_PORT", value = %value),
        }
    }
    if let Ok(value) = env::var("SMTP_USERNAME") {
        config.smtp.username = value.trim().to_string();
    }
    if let Ok(value) = env::var("SMTP_SECURITY") {
        if let Some(security) = parse_smtp_security(&value) {
            config.smtp.security = security;
        } else {
            warn!(event = "config_invalid", field = "SMTP_SECURITY", value = %value);
        }
    }
    if let Ok(value) = env::var("SMTP_FROM") {
        if !value.trim().is_empty() {
            config.smtp.from = Some(value.trim().to_string());
        }
    }
    match load_secret_env_or_file("SMTP_PASSWORD", "SMTP_PASSWORD_FILE") {
        Ok(Some(value)) => config.smtp.password = Some(value),
        Ok(None) => {}
        Err(err) => warn!(event = "config_invalid", field = "SMTP_PASSWORD", error = %err),
    }
}

pub(super) fn apply_reminder_env_overrides(config: &mut ServerConfig) {
    if let Ok(value) = env::var("DOCTRACK_REMINDERS_ENABLED") {
        if let Some(enabled) = parse_bool(&value) {
            config.reminders.enabled = enabled;
        } else {
            warn!(
                event = "config_invalid",
                field = "DOCTRACK_REMINDERS_ENABLED",
                value = %value
            );
        }
    }
    if let Ok(value) = env::var("DOCTRACK_REMINDER_SCHEDULE") {
        if !value.trim().is_empty() {
            config.reminders.schedule = value.trim().to_string();
        }
    }
    if let Ok(value) = env::var("DOCTRACK_REMINDER_WINDOW_DAYS") {
        match value.trim().parse::<i64>() {
            Ok(days) => config.reminders.window_days = days,
            Err(_) => warn!(
                event = "config_invalid",
                field = "DOCTRACK_REMINDER_WINDOW_DAYS",
                value = %value
            ),
        }
    }
    if let Ok(value) = env::var("ADMIN_EMAIL") {
        if !value.trim().is_empty() {
            config.reminders.admin_email = Some(value.trim().to_string());
        }
    }
}

pub(super) fn apply_metrics_env_overrides(config: &mut ServerConfig) {
    if let Ok(value) = env::var("DOCTRACK_METRICS_ENABLED") {
        if let Some(enabled) = parse_bool(&value) {
            config.metrics.enabled = enabled;
        } else {
            warn!(
                event = "config_invalid",
                field = "DOCTRACK_METRICS_ENABLED",
                value = %value
            );
        }
    }
    if let Ok(value) = env::var("DOCTRACK_METRICS_ENDPOINT") {
        if value.starts_with('/') {
            config.metrics.endpoint = value;
        } else {
            warn!(
                event = "config_invalid",
                field = "DOCTRACK_METRICS_ENDPOINT",
                value = %value
            );
        }
    }
    if let Ok(value) = env::var("DOCTRACK_METRICS_PROFILE") {
        if let Some(profile) = parse_metrics_profile(&value) {
            config.metrics.profile = Some(profile);
        } else {
            warn!(
                event = "config_invalid",
                field = "DOCTRACK_METRICS_PROFILE",
                value = %value
            );
        }
    }
}

pub(super) fn apply_tracing_env_overrides(config: &mut ServerConfig) {
    if let Ok(value) = env::var("DOCTRACK_TRACING_OTEL_ENABLED") {
        if let Some(enabled) = parse_bool(&value) {
            config.tracing.otel.enabled = enabled;
        } else {
            warn!(
                event = "config_invalid",
                field = "DOCTRACK_TRACING_OTEL_ENABLED",
                value = %value
            );
        }
    }
    if let Ok(value) = env::var("OTEL_EXPORTER_OTLP_ENDPOINT") {
        if !value.trim().is_empty() {
            config.tracing.otel.endpoint = Some(value.trim().to_string());
        }
    }
    if let Ok(value) = env::var("OTEL_SERVICE_NAME") {
        if !value.trim().is_empty() {
            config.tracing.otel.service_name = Some(value.trim().to_string());
        }
    }
    if let Ok(value) = env::var("SENTRY_DSN") {
        if !value.trim().is_empty() {
            config.sentry.dsn = value.trim().to_string();
            config.sentry.enabled = true;
        }
    }
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn normalize_enum(value: &str) -> String {
    value.trim().to_ascii_lowercase().replace('-', "_")
}

fn parse_smtp_security(value: &str) -> Option<SmtpSecurity> {
    match normalize_enum(value).as_str() {
        "starttls" | "start_tls" => Some(SmtpSecurity::Starttls),
        "tls" | "ssl" | "smtps" => Some(SmtpSecurity::Tls),
        "none" | "plain" => Some(SmtpSecurity::None),
        _ => None,
    }
}

fn parse_metrics_profile(value: &str) -> Option<MetricsProfile> {
    match normalize_enum(value).as_str() {
        "prod" | "production" => Some(MetricsProfile::Prod),
        "staging" => Some(MetricsProfile::Staging),
        "debug" => Some(MetricsProfile::Debug),
        _ => None,
    }
}

pub(super) fn load_secret_env_or_file(
    var_name: &str,
    file_var_name: &str,
) -> Result<Option<String>, String> {
    if let Ok(value) = env::var(var_name) {
        if !value.is_empty() {
            return Ok(Some(value));
        }
    }
    let Ok(path) = env::var(file_var_name) else {
        return Ok(None);
    };
    read_secret_file(&path)
        .map(Some)
        .map_err(|err| format!("{file_var_name} invalid: {err}"))
}

fn read_secret_file(path: &str) -> Result<String, String> {
    let value = fs::read_to_string(path)
        .map_err(|err| format!("secret file not accessible ({}): {}", path, err))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("secret file is empty ({})", path));
    }
    Ok(trimmed.to_string())
}
