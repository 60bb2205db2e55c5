use url::Url;

const PSQL_PREFIX: &str = "psql '";
const DROPPED_PARAMS: &[&str] = &["channel_binding"];

/// Cleans a connection string copied from a hosting dashboard.
///
/// Accepts the `psql '<url>'` form and removes query parameters the driver
/// does not understand.
pub fn normalize_database_url(raw: &str) -> String {
    let mut value = raw.trim();
    if let Some(rest) = value.strip_prefix(PSQL_PREFIX) {
        value = rest;
    }
    if let Some(rest) = value.strip_suffix('\'') {
        value = rest;
    }

    let Ok(mut url) = Url::parse(value) else {
        return value.replace("&channel_binding=require", "");
    };
    let Some(query) = url.query() else {
        return value.to_string();
    };
    if !query.contains("channel_binding") {
        return value.to_string();
    }
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !DROPPED_PARAMS.contains(&key.as_ref()))
        .map(|(key, val)| (key.into_owned(), val.into_owned()))
        .collect();
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
    url.to_string()
}

/// Renders the URL with the password masked, for logs.
pub fn redact_database_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            if url.password().is_some() && url.set_password(Some("***")).is_err() {
                return format!("{}://***", url.scheme());
            }
            url.to_string()
        }
        Err(_) => "postgresql://***".to_string(),
    }
}
