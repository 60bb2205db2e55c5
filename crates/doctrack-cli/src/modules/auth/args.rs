use clap::Args;

#[derive(Args)]
pub struct TokenArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long, default_value = "user")]
    pub role: String,
    #[arg(long, help = "Print only the access token")]
    pub raw: bool,
}
