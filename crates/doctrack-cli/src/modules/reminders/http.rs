use reqwest::Method;

use crate::modules::system::http::send_request;
use crate::modules::system::CommandContext;

pub(crate) async fn trigger_reminder_check(
    ctx: &CommandContext<'_>,
) -> anyhow::Result<reqwest::Response> {
    let url = ctx.url("/reminder/check");
    send_request(ctx, Method::POST, &url, None).await
}
