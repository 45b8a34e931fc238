//! Test doubles and helpers for the orchestration contract tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dyndns_core::domain::{Host, Settings, UpdateOutcome};
use dyndns_core::error::{Error, Result};
use dyndns_core::ports::{DnsUpdater, IpProvider, SettingsStore};

pub fn addr(text: &str) -> IpAddr {
    text.parse().expect("valid test address")
}

pub fn host(hostname: &str) -> Host {
    Host::new(hostname, "user", "secret")
}

/// Poll `condition` until it holds, panicking after ~2 seconds
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met within 2s");
}

/// An IP provider that always answers with the same address
pub struct StaticIpProvider {
    ip: IpAddr,
    calls: AtomicUsize,
}

impl StaticIpProvider {
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IpProvider for StaticIpProvider {
    async fn public_ip(&self) -> Result<IpAddr> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.ip)
    }
}

/// An IP provider whose discovery always fails
pub struct FailingIpProvider {
    calls: AtomicUsize,
}

impl FailingIpProvider {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IpProvider for FailingIpProvider {
    async fn public_ip(&self) -> Result<IpAddr> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::discovery("discovery service unreachable"))
    }
}

/// A DNS updater that records every exchange and answers per a script
///
/// Hosts default to success; [`fail_host`](Self::fail_host) scripts a
/// provider-level rejection, [`error_host`](Self::error_host) a hard error
/// return (which the controller must absorb).
pub struct RecordingUpdater {
    failures: Mutex<HashMap<String, String>>,
    hard_errors: Mutex<HashSet<String>>,
    calls: Mutex<Vec<(String, IpAddr)>>,
}

impl RecordingUpdater {
    pub fn new() -> Self {
        Self {
            failures: Mutex::new(HashMap::new()),
            hard_errors: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_host(&self, hostname: &str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(hostname.to_string(), message.to_string());
    }

    pub fn error_host(&self, hostname: &str) {
        self.hard_errors
            .lock()
            .unwrap()
            .insert(hostname.to_string());
    }

    pub fn calls(&self) -> Vec<(String, IpAddr)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl DnsUpdater for RecordingUpdater {
    async fn update_ip(&self, host: &Host, ip: IpAddr) -> Result<UpdateOutcome> {
        self.calls
            .lock()
            .unwrap()
            .push((host.hostname.clone(), ip));

        if self.hard_errors.lock().unwrap().contains(&host.hostname) {
            return Err(Error::updater("transport layer exploded"));
        }
        if let Some(message) = self.failures.lock().unwrap().get(&host.hostname) {
            return Ok(UpdateOutcome::failure(message.clone()));
        }
        Ok(UpdateOutcome::ok())
    }
}

/// A settings store that counts reads, for cadence-re-read assertions
pub struct SettingsProbe {
    settings: Mutex<Settings>,
    reads: AtomicUsize,
}

impl SettingsProbe {
    pub fn new(update_interval_secs: u64) -> Self {
        Self {
            settings: Mutex::new(Settings {
                update_interval_secs,
            }),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn set_interval(&self, update_interval_secs: u64) {
        self.settings.lock().unwrap().update_interval_secs = update_interval_secs;
    }
}

#[async_trait]
impl SettingsStore for SettingsProbe {
    async fn get_settings(&self) -> Result<Settings> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.settings.lock().unwrap().clone())
    }

    async fn set_settings(&self, settings: Settings) -> Result<Settings> {
        *self.settings.lock().unwrap() = settings.clone();
        Ok(settings)
    }
}
