use reqwest::Method;

use crate::modules::system::http::{append_params, build_params, opt_param, send_public};
use crate::modules::system::CommandContext;

pub(crate) async fn request_token(
    ctx: &CommandContext<'_>,
    username: &str,
    role: &str,
) -> anyhow::Result<reqwest::Response> {
    let mut url = ctx.url("/auth/token");
    let params = build_params([
        opt_param("username", Some(username.to_string())),
        opt_param("role", Some(role.to_string())),
    ]);
    append_params(&mut url, params);
    send_public(ctx, Method::POST, &url, None).await
}
