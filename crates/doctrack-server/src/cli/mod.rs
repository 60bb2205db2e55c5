use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod remind;
pub mod seed;
pub mod token;
pub mod users;

#[derive(Parser)]
#[command(name = "doctrack-server")]
#[command(about = "Doctrack Server CLI")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run database migrations and report table counts
    Migrate,
    /// Insert demo users and documents
    Seed,
    /// Print a signed bearer token
    Token(token::TokenArgs),
    /// Manage users
    User(users::UserArgs),
    /// Run one reminder check now
    Remind(remind::RemindArgs),
    /// Print OpenAPI spec (optionally to a file)
    Openapi(OpenApiArgs),
}

#[derive(Args)]
struct OpenApiArgs {
    #[arg(long, short)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub enum RunMode {
    Server,
    Migrate,
    Seed,
    Token(token::TokenArgs),
    User(users::UserArgs),
    Remind(remind::RemindArgs),
    OpenApi { out: Option<PathBuf> },
}

impl RunMode {
    /// Only the server and token signing need `JWT_SECRET`.
    pub fn requires_secret(&self) -> bool {
        matches!(self, Self::Server | Self::Token(_))
    }
}

pub fn parse_args() -> RunMode {
    let cli = Cli::parse();
    match cli.command {
        None => RunMode::Server,
        Some(Command::Migrate) => RunMode::Migrate,
        Some(Command::Seed) => RunMode::Seed,
        Some(Command::Token(args)) => RunMode::Token(args),
        Some(Command::User(args)) => RunMode::User(args),
        Some(Command::Remind(args)) => RunMode::Remind(args),
        Some(Command::Openapi(args)) => RunMode::OpenApi { out: args.out },
    }
}
