use clap::Parser;

mod cli_args;
mod cli_command;
mod modules;

use crate::cli_args::*;
use crate::cli_command::handle_command;
use crate::modules::system::CommandContext;
use tracing_subscriber::EnvFilter;

pub(crate) const DEFAULT_ADDR: &str = "http://127.0.0.1:8000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    let client = reqwest::Client::builder().build()?;
    let addr = cli.addr.trim_end_matches('/').to_string();
    if !addr.starts_with("http://") && !addr.starts_with("https://") {
        anyhow::bail!("--addr must start with http:// or https:// (got {addr})");
    }

    let mut ctx = CommandContext {
        client: &client,
        addr: &addr,
        access_token: cli.token.filter(|value| !value.trim().is_empty()),
    };
    handle_command(cli.command, &mut ctx).await
}

fn init_logging(verbosity: u8) -> anyhow::Result<()> {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter)?)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
