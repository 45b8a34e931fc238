//! Ports decoupling the update orchestration from its collaborators
//!
//! - [`IpProvider`]: discover the current public IP
//! - [`DnsUpdater`]: push one hostname → IP binding to the provider
//! - [`IpStateStore`]: durable last-known-IP record
//! - [`HostsRepository`]: durable host set with per-host outcomes
//! - [`SettingsStore`]: persisted runtime settings
//! - [`HostAdmin`]: host lifecycle and audit trail, consumed by
//!   administration surfaces

pub mod dns_updater;
pub mod hosts;
pub mod ip_provider;
pub mod ip_state;
pub mod settings;

pub use dns_updater::DnsUpdater;
pub use hosts::{HostAdmin, HostsRepository};
pub use ip_provider::IpProvider;
pub use ip_state::IpStateStore;
pub use settings::SettingsStore;
