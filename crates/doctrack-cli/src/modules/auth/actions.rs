use doctrack_core::api::auth::TokenResponse;

use super::http::request_token;
use crate::cli_args::*;
use crate::modules::system::http::read_json;
use crate::modules::system::CommandContext;

pub(crate) async fn handle_token(args: TokenArgs, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
    let response = request_token(ctx, &args.username, &args.role).await?;
    let token: TokenResponse = read_json(response).await?;
    if args.raw {
        println!("{}", token.access_token);
    } else {
        println!("{}", serde_json::to_string_pretty(&token)?);
    }
    Ok(())
}
