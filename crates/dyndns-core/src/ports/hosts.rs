// # Hosts Repository Port
//
// Durable record of the configured hosts and, per host, the outcome of the
// last update attempt. The controller reads a transient snapshot each cycle
// and writes back outcomes one host at a time.

use async_trait::async_trait;

use crate::domain::{Host, HistoryEvent};

/// Trait for the durable host set
#[async_trait]
pub trait HostsRepository: Send + Sync {
    /// All configured hosts, order-insensitive
    async fn get_hosts(&self) -> Result<Vec<Host>, crate::Error>;

    /// Hosts whose last attempt failed or never ran; the retry set when the
    /// IP is unchanged
    async fn get_pending_hosts(&self) -> Result<Vec<Host>, crate::Error>;

    /// Point lookup for forced single-host updates
    async fn get_host_by_hostname(&self, hostname: &str) -> Result<Option<Host>, crate::Error>;

    /// Record the outcome of an update attempt
    ///
    /// Idempotent upsert. A hostname that no longer exists is a no-op, not
    /// an error, so a concurrent delete cannot fail the cycle.
    async fn update_host_status(
        &self,
        hostname: &str,
        success: bool,
        error: Option<String>,
    ) -> Result<(), crate::Error>;
}

/// Host lifecycle and audit-trail access, consumed by administration
/// surfaces and daemon bootstrap rather than the update controller
#[async_trait]
pub trait HostAdmin: Send + Sync {
    /// Register a new host; fails if the hostname is already configured
    async fn add_host(&self, host: Host) -> Result<Host, crate::Error>;

    /// Remove a host; returns whether it existed
    async fn remove_host(&self, hostname: &str) -> Result<bool, crate::Error>;

    /// Most recent audit events, newest first
    async fn get_history(&self, limit: usize) -> Result<Vec<HistoryEvent>, crate::Error>;
}
