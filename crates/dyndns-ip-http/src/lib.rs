// # HTTP IP Discovery
//
// This crate discovers the caller's public IP by asking an external echo
// service over HTTP.
//
// Echo services answer either with the bare address as plain text
// (`203.0.113.5\n`) or with a small JSON wrapper (`{"ip":"203.0.113.5"}`);
// both shapes are accepted. Anything else is a discovery failure; there
// is no fallback address, the caller decides what a failed check means.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;

use dyndns_core::ports::IpProvider;
use dyndns_core::{Error, Result};

/// Default echo service (returns the bare IP as plain text)
pub const DEFAULT_DISCOVERY_URL: &str = "https://api.ipify.org";

/// Default HTTP timeout for discovery requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// IP provider backed by an HTTP echo service
pub struct HttpIpProvider {
    url: String,
    client: reqwest::Client,
}

impl HttpIpProvider {
    /// Create a provider against the default echo service
    pub fn new() -> Self {
        Self::with_url(DEFAULT_DISCOVERY_URL)
    }

    /// Create a provider against a custom echo endpoint
    pub fn with_url(url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            url: url.into(),
            client,
        }
    }
}

impl Default for HttpIpProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IpProvider for HttpIpProvider {
    async fn public_ip(&self) -> Result<IpAddr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::discovery(format!("request to {} failed: {e}", self.url)))?;

        if !response.status().is_success() {
            return Err(Error::discovery(format!(
                "{} answered HTTP {}",
                self.url,
                response.status()
            )));
        }

        let body = response.text().await.map_err(|e| {
            Error::discovery(format!("failed to read response from {}: {e}", self.url))
        })?;

        let ip = parse_echo_body(&body)?;
        tracing::debug!("discovered public IP {}", ip);
        Ok(ip)
    }
}

/// Parse an echo-service body, plain text or JSON-wrapped
fn parse_echo_body(body: &str) -> Result<IpAddr> {
    let text = body.trim();

    if let Ok(ip) = text.parse::<IpAddr>() {
        return Ok(ip);
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(text)
        && let Some(ip_text) = value.get("ip").and_then(|v| v.as_str())
        && let Ok(ip) = ip_text.trim().parse::<IpAddr>()
    {
        return Ok(ip);
    }

    Err(Error::discovery(format!(
        "unparsable discovery response: {text:?}"
    )))
}
