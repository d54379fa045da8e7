use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use yansi::Paint;

use crate::config::XanoConfig;
use crate::error::ApiError;

static SILENT: AtomicBool = AtomicBool::new(false);

pub fn set_silent(silent: bool) {
    SILENT.store(silent, Ordering::Relaxed);
}

fn log_output(msg: String) {
    if !SILENT.load(Ordering::Relaxed) {
        println!("{}", msg);
    }
}

/// Thin JSON client for the XANO workspace holding unit, city and setting
/// records.
#[derive(Clone)]
pub struct XanoClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl XanoClient {
    /// Fails with [`ApiError::NotConfigured`] listing every missing setting.
    pub fn new(client: reqwest::Client, config: &XanoConfig) -> Result<Self, ApiError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ApiError::NotConfigured(errors.join(", ")));
        }
        Ok(Self::with_base_url(client, &config.base_url, &config.api_token))
    }

    pub fn with_base_url(client: reqwest::Client, base_url: &str, token: &str) -> Self {
        XanoClient {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one request and decodes the JSON answer. An empty body decodes
    /// as `null`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        log_output(format!("Request:\n{}", curl_line(method.as_str(), &url, !self.token.is_empty(), body)));
        tracing::info!(method = %method, endpoint, "Backend request");

        let mut req = self.client.request(method, &url);
        if !self.token.is_empty() {
            req = req.bearer_auth(&self.token);
        }
        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        log_output(format!("Response:\n{}", Paint::new(&text).rgb(100, 100, 100)));

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), endpoint, "Backend returned an error");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Renders the request as a colored curl command. The token is never echoed.
fn curl_line(method: &str, url: &str, has_token: bool, body: Option<&Value>) -> String {
    let mut parts = Vec::new();
    parts.push(Paint::new("curl").fg(yansi::Color::Green).bold().to_string());
    parts.push(format!("-X {}", Paint::new(method).fg(yansi::Color::Yellow).bold()));
    parts.push(format!("'{}'", Paint::new(url).fg(yansi::Color::Cyan)));

    if has_token {
        parts.push(format!(
            "{} {}",
            Paint::new("-H").fg(yansi::Color::Magenta),
            Paint::new("'Authorization: Bearer ***'").fg(yansi::Color::Magenta)
        ));
    }
    if let Some(d) = body {
        parts.push(format!(
            "{} {}",
            Paint::new("-H").fg(yansi::Color::Magenta),
            Paint::new("'Content-Type: application/json'").fg(yansi::Color::Magenta)
        ));
        let json_str = serde_json::to_string_pretty(d).unwrap_or_default();
        let escaped_json = json_str.replace('\'', "'\\''");
        parts.push(format!(
            "{} {}",
            Paint::new("-d").fg(yansi::Color::Blue),
            Paint::new(format!("'{}'", escaped_json)).fg(yansi::Color::White)
        ));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_disabled_config() {
        let config = XanoConfig {
            instance_name: "acme".into(),
            workspace_id: "1".into(),
            api_token: "secret".into(),
            base_url: "https://acme.xano.io/api:v1".into(),
            enabled: false,
        };
        match XanoClient::new(reqwest::Client::new(), &config) {
            Err(ApiError::NotConfigured(msg)) => assert!(msg.contains("disabled")),
            _ => panic!("expected NotConfigured"),
        }
    }

    #[test]
    fn curl_line_masks_token() {
        yansi::disable();
        let line = curl_line("PATCH", "https://x/user/1", true, Some(&serde_json::json!({"name": "a'b"})));
        assert!(line.contains("Bearer ***"));
        assert!(line.contains("-X PATCH"));
        assert!(line.contains("a'\\''b"));
    }
}
