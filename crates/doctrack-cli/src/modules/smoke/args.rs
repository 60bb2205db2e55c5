use clap::Args;

#[derive(Args)]
pub struct SmokeArgs {
    #[arg(long, default_value = "admin")]
    pub username: String,
    #[arg(long, default_value = "admin", help = "Role for the issued token; reminders need admin or owner")]
    pub role: String,
    #[arg(long, default_value_t = 90, help = "Window for the expiring documents step")]
    pub days: i64,
    #[arg(long, help = "Delete the document created by the run")]
    pub cleanup: bool,
}
