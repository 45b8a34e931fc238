// # Store Implementations
//
// Bundled persistence for the host set, IP state, settings and the audit
// trail. Both stores implement every persistence port so a single instance
// can back the controller, the scheduler and an administration surface.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::domain::{HistoryAction, HistoryEvent, Host, IpState, Settings};
use crate::error::{Error, Result};

/// The full persisted state, shared by the memory and file stores
///
/// All transition rules live here so the two stores cannot drift apart:
/// which mutations bump timestamps, which append history, and which are
/// silent no-ops.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct StoreData {
    #[serde(default)]
    pub state: IpState,
    #[serde(default)]
    pub hosts: Vec<Host>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub history: Vec<HistoryEvent>,
}

impl StoreData {
    pub fn touch_check(&mut self) {
        self.state.last_check = Some(Utc::now());
    }

    /// Store a confirmed IP; appends an audit event only on a real change
    pub fn record_ip(&mut self, ip: IpAddr) {
        let previous = self.state.current_ip;
        self.state.current_ip = Some(ip);
        self.state.last_check = Some(Utc::now());

        if previous != Some(ip) {
            let from = previous.map_or_else(|| "none".to_string(), |old| old.to_string());
            self.push_history(
                HistoryAction::IpChanged,
                None,
                Some(ip),
                Some(format!("IP changed from {from} to {ip}")),
            );
        }
    }

    /// Upsert the outcome of an update attempt; unknown hostnames no-op
    pub fn record_host_status(&mut self, hostname: &str, success: bool, error: Option<String>) {
        let Some(host) = self.hosts.iter_mut().find(|h| h.hostname == hostname) else {
            return;
        };
        host.last_update = Some(Utc::now());
        host.last_status = Some(success);
        host.last_error = error.clone();

        let action = if success {
            HistoryAction::HostUpdated
        } else {
            HistoryAction::HostFailed
        };
        let details = error.or_else(|| Some("DNS update successful".to_string()));
        let ip = self.state.current_ip;
        self.push_history(action, Some(hostname.to_string()), ip, details);
    }

    pub fn add_host(&mut self, host: Host) -> Result<Host> {
        if self.hosts.iter().any(|h| h.hostname == host.hostname) {
            return Err(Error::store(format!(
                "host {} already exists",
                host.hostname
            )));
        }
        self.push_history(
            HistoryAction::HostCreated,
            Some(host.hostname.clone()),
            None,
            Some(format!("Host {} created", host.hostname)),
        );
        self.hosts.push(host.clone());
        Ok(host)
    }

    pub fn remove_host(&mut self, hostname: &str) -> bool {
        let before = self.hosts.len();
        self.hosts.retain(|h| h.hostname != hostname);
        let removed = self.hosts.len() < before;
        if removed {
            self.push_history(
                HistoryAction::HostDeleted,
                Some(hostname.to_string()),
                None,
                Some(format!("Host {hostname} deleted")),
            );
        }
        removed
    }

    pub fn set_settings(&mut self, settings: Settings) -> Settings {
        self.settings = settings;
        self.push_history(
            HistoryAction::SettingsChanged,
            None,
            None,
            Some(format!(
                "Settings updated: interval={}s",
                self.settings.update_interval_secs
            )),
        );
        self.settings.clone()
    }

    pub fn pending_hosts(&self) -> Vec<Host> {
        self.hosts.iter().filter(|h| h.is_pending()).cloned().collect()
    }

    pub fn recent_history(&self, limit: usize) -> Vec<HistoryEvent> {
        self.history.iter().rev().take(limit).cloned().collect()
    }

    fn push_history(
        &mut self,
        action: HistoryAction,
        hostname: Option<String>,
        ip: Option<IpAddr>,
        details: Option<String>,
    ) {
        self.history.push(HistoryEvent {
            timestamp: Utc::now(),
            action,
            hostname,
            ip,
            details,
        });
    }
}
