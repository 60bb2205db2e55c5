use std::time::Duration;

use clap::Args;
use doctrack_core::roles;

use crate::domains::auth::issue_token;
use crate::settings::Settings;

#[derive(Debug, Clone, Args)]
pub struct TokenArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long, default_value = roles::USER)]
    pub role: String,
    /// Overrides `auth.token_ttl_hours`
    #[arg(long, value_name = "hours")]
    pub ttl_hours: Option<u64>,
}

pub fn run(settings: &Settings, args: &TokenArgs) -> Result<(), String> {
    if args.username.trim().is_empty() {
        return Err("username must not be empty".to_string());
    }
    let hours = args
        .ttl_hours
        .unwrap_or(settings.config.auth.token_ttl_hours);
    if hours == 0 {
        return Err("ttl must be at least one hour".to_string());
    }
    let issued = issue_token(
        &settings.jwt_secret,
        &settings.config.auth.token_marker,
        args.username.trim(),
        args.role.trim(),
        Duration::from_secs(hours.saturating_mul(3600)),
    )
    .map_err(|err| format!("token signing failed: {err}"))?;
    crate::infra::metrics::tokens_issued("cli");
    println!("{}", issued.token);
    Ok(())
}
