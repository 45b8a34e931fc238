// # OVH-style DNS Updater
//
// This crate pushes hostname → IP bindings over the classic GET-based
// dynamic-update protocol: one authenticated request per host, answered
// with a terse plain-text code.
//
// ## Wire Format
//
// ```http
// GET /nic/update?system=dyndns&hostname=home.example.com&myip=203.0.113.5
// Authorization: Basic <host username:password>
// ```
//
// The response body starts with a status code (`good`, `nochg`, `badauth`,
// …), optionally followed by echo data such as the accepted IP. The code
// table in [`parse_response`] is the authoritative contract with the
// provider and must not drift.
//
// ## Error Discipline
//
// Provider rejections and transport failures are both part of the
// [`UpdateOutcome`]: this updater never returns `Err`, so one unreachable
// host can never abort a reconciliation pass. The engine owns retries (on
// later cycles via the pending set); this adapter performs exactly one
// exchange per call.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;

use dyndns_core::Result;
use dyndns_core::domain::{Host, UpdateOutcome};
use dyndns_core::ports::DnsUpdater;

/// Default update endpoint
pub const DEFAULT_BASE_URL: &str = "https://www.ovh.com/nic/update";

/// Fixed system identifier sent with every update
pub const DEFAULT_SYSTEM: &str = "dyndns";

/// Default HTTP timeout for update requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// DNS updater speaking the OVH-style GET protocol
pub struct OvhUpdater {
    base_url: String,
    system: String,
    client: reqwest::Client,
}

impl OvhUpdater {
    /// Create an updater against the default OVH endpoint
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_BASE_URL, DEFAULT_SYSTEM, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create an updater against a custom endpoint
    ///
    /// Useful for compatible providers and for tests against a local mock
    /// server.
    pub fn with_endpoint(
        base_url: impl Into<String>,
        system: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base_url.into(),
            system: system.into(),
            client,
        }
    }
}

impl Default for OvhUpdater {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DnsUpdater for OvhUpdater {
    async fn update_ip(&self, host: &Host, ip: IpAddr) -> Result<UpdateOutcome> {
        tracing::debug!("pushing {} -> {}", host.hostname, ip);

        let ip_text = ip.to_string();
        let request = self
            .client
            .get(&self.base_url)
            .query(&[
                ("system", self.system.as_str()),
                ("hostname", host.hostname.as_str()),
                ("myip", ip_text.as_str()),
            ])
            .basic_auth(&host.username, Some(host.password.expose()));

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                return Ok(UpdateOutcome::failure(format!("Connection error: {e}")));
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Ok(UpdateOutcome::failure(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status")
            )));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Ok(UpdateOutcome::failure(format!("Connection error: {e}")));
            }
        };

        tracing::debug!("provider answered for {}: {}", host.hostname, body.trim());
        Ok(parse_response(&body))
    }
}

/// Classify a provider response body
///
/// Matching is on the first whitespace-delimited word of the trimmed,
/// lower-cased body; trailing echo data (`good 203.0.113.5`) is ignored.
/// Anything unrecognized is a failure, never a silent success.
pub fn parse_response(body: &str) -> UpdateOutcome {
    let normalized = body.trim().to_ascii_lowercase();
    let code = normalized.split_whitespace().next().unwrap_or("");

    match code {
        "good" | "nochg" => UpdateOutcome::ok(),
        "nohost" => UpdateOutcome::failure("Hostname not found in account"),
        "badauth" => UpdateOutcome::failure("Authentication failed for host"),
        "notfqdn" => UpdateOutcome::failure("Invalid hostname format"),
        "abuse" => UpdateOutcome::failure("Too many requests, host blocked for abuse"),
        "911" => UpdateOutcome::failure("Provider service error, retry later"),
        "badagent" => UpdateOutcome::failure("Invalid request"),
        _ => UpdateOutcome::failure(format!("Unknown error: {}", body.trim())),
    }
}
