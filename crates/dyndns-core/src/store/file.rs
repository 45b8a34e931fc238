// # File Store
//
// File-backed implementation of the persistence ports.
//
// State lives in a single versioned JSON document. Every mutation rewrites
// the file via write-then-rename so a crash mid-write leaves the previous
// snapshot intact. The write lock is held across the rename, which
// serializes concurrent writers (a scheduled cycle overlapping a manual
// trigger) and keeps snapshots ordered.

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::domain::{HistoryEvent, Host, IpState, Settings};
use crate::error::{Error, Result};
use crate::ports::{HostAdmin, HostsRepository, IpStateStore, SettingsStore};
use crate::store::StoreData;

/// Store file format version, for future migrations
const STORE_FILE_VERSION: &str = "1.0";

#[derive(serde::Serialize, serde::Deserialize)]
struct StoreFileFormat {
    version: String,
    data: StoreData,
}

/// File-backed store with atomic writes
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: Arc<RwLock<StoreData>>,
}

impl FileStore {
    /// Open an existing store file, or start empty if none exists
    ///
    /// Parent directories are created as needed. A file that exists but
    /// cannot be parsed is an error rather than a silent reset: starting
    /// empty would drop host credentials and re-push everything.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::store(format!(
                    "failed to create store directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let data = Self::load(&path).await?;
        Ok(Self {
            path,
            data: Arc::new(RwLock::new(data)),
        })
    }

    async fn load(path: &Path) -> Result<StoreData> {
        if !path.exists() {
            tracing::debug!("store file {} does not exist, starting empty", path.display());
            return Ok(StoreData::default());
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| Error::store(format!("failed to read {}: {}", path.display(), e)))?;

        let parsed: StoreFileFormat = serde_json::from_str(&content)
            .map_err(|e| Error::store(format!("failed to parse {}: {}", path.display(), e)))?;

        if parsed.version != STORE_FILE_VERSION {
            tracing::warn!(
                "store file version mismatch: expected {}, got {}",
                STORE_FILE_VERSION,
                parsed.version
            );
        }

        Ok(parsed.data)
    }

    /// Serialize `data` and swap it into place atomically
    async fn persist(&self, data: &StoreData) -> Result<()> {
        let snapshot = StoreFileFormat {
            version: STORE_FILE_VERSION.to_string(),
            data: data.clone(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;

        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::store(format!("failed to create {}: {}", temp_path.display(), e))
            })?;
            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::store(format!("failed to write {}: {}", temp_path.display(), e))
            })?;
            file.flush().await.map_err(|e| {
                Error::store(format!("failed to flush {}: {}", temp_path.display(), e))
            })?;
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::store(format!(
                "failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("store written to {}", self.path.display());
        Ok(())
    }

    /// Apply `f` under the write lock and persist the result before
    /// releasing it
    async fn mutate<R>(&self, f: impl FnOnce(&mut StoreData) -> R) -> Result<R> {
        let mut guard = self.data.write().await;
        let out = f(&mut guard);
        self.persist(&guard).await?;
        Ok(out)
    }
}

#[async_trait]
impl IpStateStore for FileStore {
    async fn get_ip(&self) -> Result<Option<IpAddr>> {
        Ok(self.data.read().await.state.current_ip)
    }

    async fn set_ip(&self, ip: IpAddr) -> Result<()> {
        self.mutate(|data| data.record_ip(ip)).await
    }

    async fn update_last_check(&self) -> Result<()> {
        self.mutate(|data| data.touch_check()).await
    }

    async fn get_state(&self) -> Result<IpState> {
        Ok(self.data.read().await.state.clone())
    }
}

#[async_trait]
impl HostsRepository for FileStore {
    async fn get_hosts(&self) -> Result<Vec<Host>> {
        Ok(self.data.read().await.hosts.clone())
    }

    async fn get_pending_hosts(&self) -> Result<Vec<Host>> {
        Ok(self.data.read().await.pending_hosts())
    }

    async fn get_host_by_hostname(&self, hostname: &str) -> Result<Option<Host>> {
        let guard = self.data.read().await;
        Ok(guard.hosts.iter().find(|h| h.hostname == hostname).cloned())
    }

    async fn update_host_status(
        &self,
        hostname: &str,
        success: bool,
        error: Option<String>,
    ) -> Result<()> {
        self.mutate(|data| data.record_host_status(hostname, success, error))
            .await
    }
}

#[async_trait]
impl SettingsStore for FileStore {
    async fn get_settings(&self) -> Result<Settings> {
        Ok(self.data.read().await.settings.clone())
    }

    async fn set_settings(&self, settings: Settings) -> Result<Settings> {
        self.mutate(|data| data.set_settings(settings)).await
    }
}

#[async_trait]
impl HostAdmin for FileStore {
    async fn add_host(&self, host: Host) -> Result<Host> {
        let mut guard = self.data.write().await;
        let added = guard.add_host(host)?;
        self.persist(&guard).await?;
        Ok(added)
    }

    async fn remove_host(&self, hostname: &str) -> Result<bool> {
        self.mutate(|data| data.remove_host(hostname)).await
    }

    async fn get_history(&self, limit: usize) -> Result<Vec<HistoryEvent>> {
        Ok(self.data.read().await.recent_history(limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn state_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        let ip: IpAddr = "203.0.113.5".parse().unwrap();
        {
            let store = FileStore::open(&path).await.unwrap();
            store
                .add_host(Host::new("a.example.com", "user", "secret"))
                .await
                .unwrap();
            store.set_ip(ip).await.unwrap();
            store
                .update_host_status("a.example.com", true, None)
                .await
                .unwrap();
        }

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.get_ip().await.unwrap(), Some(ip));

        let host = store
            .get_host_by_hostname("a.example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(host.last_status, Some(true));
        assert_eq!(host.password.expose(), "secret");
        assert!(store.get_pending_hosts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn parent_directories_are_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("store.json");

        let store = FileStore::open(&path).await.unwrap();
        store.update_last_check().await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn rapid_writes_leave_a_consistent_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::open(&path).await.unwrap();
        for i in 0..10 {
            let ip: IpAddr = format!("203.0.113.{i}").parse().unwrap();
            store.set_ip(ip).await.unwrap();
        }

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get_ip().await.unwrap(),
            Some("203.0.113.9".parse().unwrap())
        );
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error_not_a_reset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, b"not json").await.unwrap();

        assert!(FileStore::open(&path).await.is_err());
    }

    #[tokio::test]
    async fn settings_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let store = FileStore::open(&path).await.unwrap();
            store
                .set_settings(Settings {
                    update_interval_secs: 600,
                })
                .await
                .unwrap();
        }

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(
            store.get_settings().await.unwrap().update_interval_secs,
            600
        );
    }
}
