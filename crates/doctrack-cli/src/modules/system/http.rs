use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::modules::system::CommandContext;

pub(crate) fn auth_headers(token: Option<&str>) -> anyhow::Result<HeaderMap> {
    let Some(token) = token.filter(|value| !value.trim().is_empty()) else {
        anyhow::bail!("token is required (DOCTRACK_TOKEN or --token)");
    };
    let mut headers = HeaderMap::new();
    let value = HeaderValue::from_str(&format!("Bearer {token}"))?;
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// Sends a request carrying the bearer token from the context.
pub(crate) async fn send_request(
    ctx: &CommandContext<'_>,
    method: Method,
    url: &str,
    payload: Option<serde_json::Value>,
) -> anyhow::Result<reqwest::Response> {
    let headers = auth_headers(ctx.access_token.as_deref())?;
    send_request_once(ctx, method, url, headers, payload).await
}

/// Sends a request to an endpoint that does not require authentication.
pub(crate) async fn send_public(
    ctx: &CommandContext<'_>,
    method: Method,
    url: &str,
    payload: Option<serde_json::Value>,
) -> anyhow::Result<reqwest::Response> {
    send_request_once(ctx, method, url, HeaderMap::new(), payload).await
}

async fn send_request_once(
    ctx: &CommandContext<'_>,
    method: Method,
    url: &str,
    headers: HeaderMap,
    payload: Option<serde_json::Value>,
) -> anyhow::Result<reqwest::Response> {
    let method_clone = method.clone();
    let builder = ctx.client.request(method, url).headers(headers);
    let builder = if let Some(payload) = payload {
        builder.json(&payload)
    } else {
        builder
    };
    debug!(method = %method_clone, url = %url, "http request");
    let start = std::time::Instant::now();
    let response = builder.send().await?;
    debug!(
        method = %method_clone,
        url = %url,
        status = %response.status(),
        elapsed_ms = start.elapsed().as_millis(),
        "http response"
    );
    Ok(response)
}

pub(crate) async fn print_json_response(response: reqwest::Response) -> anyhow::Result<()> {
    let body: serde_json::Value = read_json(response).await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> anyhow::Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Request failed: {status} {body}");
    }
    Ok(response.json::<T>().await?)
}

pub(crate) fn build_params<const N: usize>(
    pairs: [Option<(String, String)>; N],
) -> Vec<(String, String)> {
    pairs.into_iter().flatten().collect()
}

pub(crate) fn opt_param(key: &str, value: Option<String>) -> Option<(String, String)> {
    value.map(|value| (key.to_string(), value))
}

pub(crate) fn append_params(url: &mut String, params: Vec<(String, String)>) {
    if params.is_empty() {
        return;
    }
    let query = params
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
        .collect::<Vec<String>>()
        .join("&");
    url.push('?');
    url.push_str(&query);
}
