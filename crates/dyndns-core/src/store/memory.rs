// # Memory Store
//
// In-memory implementation of the persistence ports.
//
// Nothing survives a restart: the first cycle after a crash treats the
// discovered IP as new and re-pushes every host, which the provider answers
// with a no-change code. Useful for tests and for container deployments
// where that initial re-push is harmless.

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{HistoryEvent, Host, IpState, Settings};
use crate::error::Result;
use crate::ports::{HostAdmin, HostsRepository, IpStateStore, SettingsStore};
use crate::store::StoreData;

/// In-memory store, shared via `Clone`
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<StoreData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IpStateStore for MemoryStore {
    async fn get_ip(&self) -> Result<Option<IpAddr>> {
        Ok(self.inner.read().await.state.current_ip)
    }

    async fn set_ip(&self, ip: IpAddr) -> Result<()> {
        self.inner.write().await.record_ip(ip);
        Ok(())
    }

    async fn update_last_check(&self) -> Result<()> {
        self.inner.write().await.touch_check();
        Ok(())
    }

    async fn get_state(&self) -> Result<IpState> {
        Ok(self.inner.read().await.state.clone())
    }
}

#[async_trait]
impl HostsRepository for MemoryStore {
    async fn get_hosts(&self) -> Result<Vec<Host>> {
        Ok(self.inner.read().await.hosts.clone())
    }

    async fn get_pending_hosts(&self) -> Result<Vec<Host>> {
        Ok(self.inner.read().await.pending_hosts())
    }

    async fn get_host_by_hostname(&self, hostname: &str) -> Result<Option<Host>> {
        let guard = self.inner.read().await;
        Ok(guard.hosts.iter().find(|h| h.hostname == hostname).cloned())
    }

    async fn update_host_status(
        &self,
        hostname: &str,
        success: bool,
        error: Option<String>,
    ) -> Result<()> {
        self.inner
            .write()
            .await
            .record_host_status(hostname, success, error);
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get_settings(&self) -> Result<Settings> {
        Ok(self.inner.read().await.settings.clone())
    }

    async fn set_settings(&self, settings: Settings) -> Result<Settings> {
        Ok(self.inner.write().await.set_settings(settings))
    }
}

#[async_trait]
impl HostAdmin for MemoryStore {
    async fn add_host(&self, host: Host) -> Result<Host> {
        self.inner.write().await.add_host(host)
    }

    async fn remove_host(&self, hostname: &str) -> Result<bool> {
        Ok(self.inner.write().await.remove_host(hostname))
    }

    async fn get_history(&self, limit: usize) -> Result<Vec<HistoryEvent>> {
        Ok(self.inner.read().await.recent_history(limit))
    }
}
