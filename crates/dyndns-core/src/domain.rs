//! Domain types shared across the dyndns system
//!
//! - [`Host`]: a managed hostname with its provider credentials and the
//!   outcome of the last update attempt
//! - [`IpState`]: the singleton last-known-IP record
//! - [`UpdateOutcome`]: the classified result of one provider exchange
//! - [`HistoryEvent`]: append-only audit trail entries, written by stores
//! - [`Settings`]: persisted runtime settings read by the scheduler

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Default update interval when no settings have been persisted yet
pub const DEFAULT_UPDATE_INTERVAL_SECS: u64 = 300;

/// A provider credential.
///
/// Wraps the secret so it cannot leak through `Debug`/`Display` formatting.
/// Serde passes the value through unchanged so durable stores can persist it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Read the secret, e.g. to build an authenticated request.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// A managed hostname → IP binding
///
/// Identity is the hostname (unique). The `last_*` fields are mutated only
/// through [`crate::ports::HostsRepository::update_host_status`] after an
/// update attempt; `last_status` is tri-state (never attempted / success /
/// failure).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub hostname: String,
    pub username: String,
    pub password: Credential,

    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,

    #[serde(default)]
    pub last_status: Option<bool>,

    #[serde(default)]
    pub last_error: Option<String>,
}

impl Host {
    /// Create a host that has never been pushed to the provider
    pub fn new(
        hostname: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            username: username.into(),
            password: Credential::new(password),
            last_update: None,
            last_status: None,
            last_error: None,
        }
    }

    /// Whether this host needs attention: last attempt failed or never ran
    pub fn is_pending(&self) -> bool {
        !matches!(self.last_status, Some(true))
    }
}

/// Singleton record of the last known public IP
///
/// `last_check` is bumped on every cycle; `current_ip` only when a
/// confirmed-different address is discovered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpState {
    pub current_ip: Option<IpAddr>,
    pub last_check: Option<DateTime<Utc>>,
}

/// Classified result of a single provider exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub success: bool,
    pub message: Option<String>,
}

impl UpdateOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Summary of one controller cycle, for logging and status surfaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// The public IP discovered this cycle
    pub ip: IpAddr,
    /// Whether it differed from the stored value
    pub ip_changed: bool,
    /// Hosts for which an update was attempted
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Kind of state transition recorded in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    IpChanged,
    HostUpdated,
    HostFailed,
    HostCreated,
    HostDeleted,
    SettingsChanged,
}

/// One immutable audit record, appended by stores on state transitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub timestamp: DateTime<Utc>,
    pub action: HistoryAction,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub ip: Option<IpAddr>,
    #[serde(default)]
    pub details: Option<String>,
}

/// Persisted runtime settings
///
/// Re-read by the scheduler each iteration so external changes take effect
/// without a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_update_interval")]
    pub update_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            update_interval_secs: DEFAULT_UPDATE_INTERVAL_SECS,
        }
    }
}

fn default_update_interval() -> u64 {
    DEFAULT_UPDATE_INTERVAL_SECS
}
