use reqwest::Method;

use crate::modules::system::http::{print_json_response, send_public};
use crate::modules::system::CommandContext;

pub(crate) async fn handle_health(ctx: &CommandContext<'_>) -> anyhow::Result<()> {
    let url = ctx.url("/health");
    let response = send_public(ctx, Method::GET, &url, None).await?;
    print_json_response(response).await
}
