//! Scheduler
//!
//! Drives the [`UpdateController`] on a configurable cadence. Each
//! iteration re-reads the interval from the [`SettingsStore`], runs one
//! cycle, then sleeps in short slices so that shutdown and manual triggers
//! are observed promptly instead of at the end of a long sleep.
//!
//! Controller errors are logged and never terminate the loop; an in-flight
//! cycle is allowed to complete when shutdown is requested.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::controller::UpdateController;
use crate::domain::DEFAULT_UPDATE_INTERVAL_SECS;
use crate::ports::SettingsStore;

/// Bounds applied to the configured interval
pub const MIN_UPDATE_INTERVAL_SECS: u64 = 10;
pub const MAX_UPDATE_INTERVAL_SECS: u64 = 86_400;

/// Granularity at which the sleep observes cancellation and triggers
const DEFAULT_SLICE: Duration = Duration::from_secs(1);

/// Remote control over a running scheduler loop
///
/// Cloneable; hand it to whatever surface needs to force an immediate
/// cycle (e.g. after mutating hosts or settings) or to shut the loop down.
#[derive(Clone)]
pub struct SchedulerHandle {
    trigger: Arc<Notify>,
    cancel: CancellationToken,
}

impl SchedulerHandle {
    /// End the current sleep and run a cycle now
    ///
    /// A trigger fired while a cycle is running is remembered and honored
    /// as soon as that cycle finishes.
    pub fn trigger_now(&self) {
        self.trigger.notify_one();
    }

    /// Request cooperative shutdown; an in-flight cycle completes first
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

/// Background loop running controller cycles on the configured cadence
pub struct Scheduler {
    controller: Arc<UpdateController>,
    settings: Arc<dyn SettingsStore>,
    trigger: Arc<Notify>,
    cancel: CancellationToken,
    slice: Duration,
}

impl Scheduler {
    pub fn new(controller: Arc<UpdateController>, settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            controller,
            settings,
            trigger: Arc::new(Notify::new()),
            cancel: CancellationToken::new(),
            slice: DEFAULT_SLICE,
        }
    }

    /// Override the sleep-slice granularity (tests use a few milliseconds)
    pub fn with_slice(mut self, slice: Duration) -> Self {
        self.slice = slice;
        self
    }

    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            trigger: self.trigger.clone(),
            cancel: self.cancel.clone(),
        }
    }

    /// Run until shutdown is requested
    pub async fn run(self) {
        info!("scheduler started");
        let mut interval: Option<u64> = None;

        while !self.cancel.is_cancelled() {
            let current = self.read_interval(interval).await;
            interval = Some(current);

            match self.controller.run_cycle().await {
                Ok(report) if report.attempted > 0 => info!(
                    "update cycle finished: ip {}, {} updated, {} failed",
                    report.ip, report.succeeded, report.failed
                ),
                Ok(report) => debug!("update cycle finished: ip {}, nothing to do", report.ip),
                Err(e) => error!("update cycle failed: {}", e),
            }

            if !self.sleep_until_next(current).await {
                break;
            }
        }

        info!("scheduler stopped");
    }

    /// Read the configured interval, clamped to sane bounds
    ///
    /// A store failure keeps the previous interval so a transient
    /// persistence hiccup cannot stall or stampede the loop.
    async fn read_interval(&self, previous: Option<u64>) -> u64 {
        let configured = match self.settings.get_settings().await {
            Ok(settings) => settings.update_interval_secs,
            Err(e) => {
                warn!("could not read settings, keeping current interval: {}", e);
                return previous.unwrap_or(DEFAULT_UPDATE_INTERVAL_SECS);
            }
        };

        let clamped = clamp_interval(configured);
        if clamped != configured {
            warn!(
                "configured interval {}s out of range, using {}s",
                configured, clamped
            );
        }
        if previous != Some(clamped) {
            info!("update interval set to {} seconds", clamped);
        }
        clamped
    }

    /// Sleep `interval_secs`, one slice at a time
    ///
    /// Returns `false` when shutdown was requested; a manual trigger ends
    /// the sleep early and returns `true` so the next cycle starts
    /// immediately.
    async fn sleep_until_next(&self, interval_secs: u64) -> bool {
        let deadline = Instant::now() + Duration::from_secs(interval_secs);

        loop {
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            let nap = self.slice.min(deadline - now);

            tokio::select! {
                _ = self.cancel.cancelled() => return false,
                _ = self.trigger.notified() => {
                    info!("manual trigger received, running update cycle now");
                    return true;
                }
                _ = tokio::time::sleep(nap) => {}
            }
        }
    }
}

fn clamp_interval(secs: u64) -> u64 {
    secs.clamp(MIN_UPDATE_INTERVAL_SECS, MAX_UPDATE_INTERVAL_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_is_clamped_to_bounds() {
        assert_eq!(clamp_interval(0), MIN_UPDATE_INTERVAL_SECS);
        assert_eq!(clamp_interval(9), MIN_UPDATE_INTERVAL_SECS);
        assert_eq!(clamp_interval(300), 300);
        assert_eq!(clamp_interval(u64::MAX), MAX_UPDATE_INTERVAL_SECS);
    }
}
