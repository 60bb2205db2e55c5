use chrono::NaiveDate;
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct DocsArgs {
    #[command(subcommand)]
    pub command: DocsCommand,
}

#[derive(Subcommand)]
pub enum DocsCommand {
    List(DocsListArgs),
    Get(DocsGetArgs),
    Create(DocsCreateArgs),
    Update(DocsUpdateArgs),
    Delete(DocsDeleteArgs),
    #[command(about = "List documents expiring within the given number of days")]
    Expiring(DocsExpiringArgs),
}

#[derive(Args)]
pub struct DocsListArgs {
    #[arg(long)]
    pub skip: Option<i64>,
    #[arg(long)]
    pub limit: Option<i64>,
    #[arg(long, help = "Print a table instead of JSON")]
    pub table: bool,
}

#[derive(Args)]
pub struct DocsGetArgs {
    pub sno: i32,
}

#[derive(Args)]
pub struct DocsCreateArgs {
    #[arg(long = "type")]
    pub document_type: String,
    #[arg(long)]
    pub owner: String,
    #[arg(long)]
    pub number: String,
    #[arg(long, help = "Expiry date (YYYY-MM-DD)")]
    pub expiry: NaiveDate,
    #[arg(long, help = "Action due date (YYYY-MM-DD)")]
    pub due: NaiveDate,
}

#[derive(Args)]
pub struct DocsUpdateArgs {
    pub sno: i32,
    #[arg(long = "type")]
    pub document_type: Option<String>,
    #[arg(long)]
    pub owner: Option<String>,
    #[arg(long)]
    pub number: Option<String>,
    #[arg(long)]
    pub expiry: Option<NaiveDate>,
    #[arg(long)]
    pub due: Option<NaiveDate>,
}

#[derive(Args)]
pub struct DocsDeleteArgs {
    pub sno: i32,
}

#[derive(Args)]
pub struct DocsExpiringArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub days: Option<i64>,
    #[arg(long, help = "Print a table instead of JSON")]
    pub table: bool,
}
