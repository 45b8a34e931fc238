// # Settings Store Port
//
// Persisted runtime settings. The scheduler re-reads these every iteration,
// which is what makes external interval changes take effect without a
// restart.

use async_trait::async_trait;

use crate::domain::Settings;

/// Trait for persisted runtime settings
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Current settings; defaults if none were ever persisted
    async fn get_settings(&self) -> Result<Settings, crate::Error>;

    /// Replace the settings, returning the stored value
    async fn set_settings(&self, settings: Settings) -> Result<Settings, crate::Error>;
}
