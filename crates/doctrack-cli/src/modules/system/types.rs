pub struct CommandContext<'a> {
    pub client: &'a reqwest::Client,
    pub addr: &'a str,
    pub access_token: Option<String>,
}

impl CommandContext<'_> {
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr.trim_end_matches('/'), path)
    }
}
