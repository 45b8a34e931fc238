//! Update controller
//!
//! The UpdateController is responsible for:
//! - Discovering the current public IP via [`IpProvider`]
//! - Comparing it against the stored value in [`IpStateStore`]
//! - Deciding which hosts need a push (all on IP change, pending-only
//!   otherwise)
//! - Reconciling host by host via [`DnsUpdater`], persisting each outcome
//!   through [`HostsRepository`]
//!
//! ## Cycle Flow
//!
//! ```text
//! discover IP ──err──▶ abort cycle (no mutation)
//!      │
//!      ▼
//! bump last-check
//!      │
//!      ├─ unchanged ──▶ reconcile pending hosts (may be none)
//!      │
//!      └─ changed ────▶ persist new IP, reconcile ALL hosts
//! ```
//!
//! A host-level failure is recorded and never aborts the rest of the pass;
//! discovery and store failures abort the cycle and are left to the caller
//! (the scheduler logs them and continues on its next tick).

use std::net::IpAddr;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{CycleReport, Host, UpdateOutcome};
use crate::error::Result;
use crate::ports::{DnsUpdater, HostsRepository, IpProvider, IpStateStore};

/// Orchestrates one convergence cycle over the configured hosts
///
/// Holds no interior locks: each invocation is a self-contained sequence of
/// port calls, so a scheduled tick overlapping a manual trigger cannot
/// deadlock. The stores serialize their own writes; per-host status upserts
/// are idempotent and last-writer-wins is acceptable for the IP record.
pub struct UpdateController {
    ip_provider: Arc<dyn IpProvider>,
    updater: Arc<dyn DnsUpdater>,
    ip_state: Arc<dyn IpStateStore>,
    hosts: Arc<dyn HostsRepository>,
}

impl UpdateController {
    pub fn new(
        ip_provider: Arc<dyn IpProvider>,
        updater: Arc<dyn DnsUpdater>,
        ip_state: Arc<dyn IpStateStore>,
        hosts: Arc<dyn HostsRepository>,
    ) -> Self {
        Self {
            ip_provider,
            updater,
            ip_state,
            hosts,
        }
    }

    /// Run one convergence cycle
    ///
    /// Returns a [`CycleReport`] summarizing what was attempted. Errors are
    /// fatal for this cycle only: discovery failures abort before any
    /// mutation, store failures abort wherever they occur. Host-level
    /// update failures are recorded per host and never surface here.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let ip = self.ip_provider.public_ip().await?;

        // Every successful check leaves a trace, changed IP or not.
        self.ip_state.update_last_check().await?;

        let stored = self.ip_state.get_ip().await?;
        let ip_changed = stored != Some(ip);

        let targets = if ip_changed {
            info!(
                "public IP changed ({} -> {}), updating all hosts",
                stored.map_or_else(|| "none".to_string(), |old| old.to_string()),
                ip
            );
            self.ip_state.set_ip(ip).await?;
            self.hosts.get_hosts().await?
        } else {
            let pending = self.hosts.get_pending_hosts().await?;
            if pending.is_empty() {
                debug!("public IP {} unchanged, nothing pending", ip);
                return Ok(CycleReport {
                    ip,
                    ip_changed: false,
                    attempted: 0,
                    succeeded: 0,
                    failed: 0,
                });
            }
            info!(
                "public IP {} unchanged, retrying {} pending host(s)",
                ip,
                pending.len()
            );
            pending
        };

        let attempted = targets.len();
        let (succeeded, failed) = self.reconcile(&targets, ip).await?;

        Ok(CycleReport {
            ip,
            ip_changed,
            attempted,
            succeeded,
            failed,
        })
    }

    /// Update a single host on demand, outside the scheduled cadence
    ///
    /// An unknown hostname yields a failure outcome with zero side effects.
    /// When no IP was ever stored, a fresh discovery is performed and
    /// persisted first; otherwise the stored address is pushed as-is.
    pub async fn force_update_host(&self, hostname: &str) -> Result<UpdateOutcome> {
        let Some(host) = self.hosts.get_host_by_hostname(hostname).await? else {
            return Ok(UpdateOutcome::failure(format!(
                "host {hostname} is not configured"
            )));
        };

        let ip = match self.ip_state.get_ip().await? {
            Some(ip) => ip,
            None => {
                let ip = self.ip_provider.public_ip().await?;
                info!("no stored IP, discovered {} for forced update", ip);
                self.ip_state.set_ip(ip).await?;
                ip
            }
        };
        self.ip_state.update_last_check().await?;

        let outcome = self.push_binding(&host, ip).await;
        self.hosts
            .update_host_status(&host.hostname, outcome.success, outcome.message.clone())
            .await?;
        Ok(outcome)
    }

    /// Push `ip` to every host in `targets`, persisting each outcome as it
    /// lands. Returns (succeeded, failed) counts.
    async fn reconcile(&self, targets: &[Host], ip: IpAddr) -> Result<(usize, usize)> {
        let mut succeeded = 0;
        let mut failed = 0;

        for host in targets {
            let UpdateOutcome { success, message } = self.push_binding(host, ip).await;
            if success {
                debug!("updated {} -> {}", host.hostname, ip);
                succeeded += 1;
            } else {
                warn!(
                    "update failed for {}: {}",
                    host.hostname,
                    message.as_deref().unwrap_or("unknown error")
                );
                failed += 1;
            }
            self.hosts
                .update_host_status(&host.hostname, success, message)
                .await?;
        }

        Ok((succeeded, failed))
    }

    /// One provider exchange, with any updater error folded into a failed
    /// outcome so it can be recorded instead of propagated.
    async fn push_binding(&self, host: &Host, ip: IpAddr) -> UpdateOutcome {
        match self.updater.update_ip(host, ip).await {
            Ok(outcome) => outcome,
            Err(e) => UpdateOutcome::failure(e.to_string()),
        }
    }
}
