use doctrack_core::{DocumentPatch, NewDocument};
use reqwest::Method;

use crate::modules::system::http::{append_params, build_params, opt_param, send_request};
use crate::modules::system::CommandContext;

pub(crate) async fn list_documents(
    ctx: &CommandContext<'_>,
    skip: Option<i64>,
    limit: Option<i64>,
) -> anyhow::Result<reqwest::Response> {
    let mut url = ctx.url("/documents/");
    let params = build_params([
        opt_param("skip", skip.map(|value| value.to_string())),
        opt_param("limit", limit.map(|value| value.to_string())),
    ]);
    append_params(&mut url, params);
    send_request(ctx, Method::GET, &url, None).await
}

pub(crate) async fn get_document(
    ctx: &CommandContext<'_>,
    sno: i32,
) -> anyhow::Result<reqwest::Response> {
    let url = ctx.url(&format!("/documents/{sno}"));
    send_request(ctx, Method::GET, &url, None).await
}

pub(crate) async fn create_document(
    ctx: &CommandContext<'_>,
    payload: &NewDocument,
) -> anyhow::Result<reqwest::Response> {
    let url = ctx.url("/documents/");
    send_request(ctx, Method::POST, &url, Some(serde_json::to_value(payload)?)).await
}

pub(crate) async fn update_document(
    ctx: &CommandContext<'_>,
    sno: i32,
    payload: &DocumentPatch,
) -> anyhow::Result<reqwest::Response> {
    let url = ctx.url(&format!("/documents/{sno}"));
    send_request(ctx, Method::PUT, &url, Some(serde_json::to_value(payload)?)).await
}

pub(crate) async fn delete_document(
    ctx: &CommandContext<'_>,
    sno: i32,
) -> anyhow::Result<reqwest::Response> {
    let url = ctx.url(&format!("/documents/{sno}"));
    send_request(ctx, Method::DELETE, &url, None).await
}

pub(crate) async fn expiring_documents(
    ctx: &CommandContext<'_>,
    days: Option<i64>,
) -> anyhow::Result<reqwest::Response> {
    let mut url = ctx.url("/documents/expiring/soon");
    let params = build_params([opt_param("days", days.map(|value| value.to_string()))]);
    append_params(&mut url, params);
    send_request(ctx, Method::GET, &url, None).await
}
