use clap::{ArgAction, Parser, Subcommand};

pub use crate::modules::auth::args::*;
pub use crate::modules::documents::args::*;
pub use crate::modules::smoke::args::*;

#[derive(Parser)]
#[command(name = "doctrack")]
#[command(about = "Doctrack CLI")]
pub struct Cli {
    #[arg(long, env = "DOCTRACK_URL", default_value = crate::DEFAULT_ADDR)]
    pub addr: String,
    #[arg(long, env = "DOCTRACK_TOKEN")]
    pub token: Option<String>,
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(about = "Check server and database health")]
    Health,
    #[command(about = "Request an access token")]
    Token(TokenArgs),
    #[command(about = "Manage tracked documents")]
    Docs(DocsArgs),
    #[command(about = "Trigger a reminder check (admin or owner)")]
    Remind,
    #[command(about = "Run the end-to-end API check")]
    Smoke(SmokeArgs),
}
