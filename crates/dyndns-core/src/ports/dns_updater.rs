// # DNS Updater Port
//
// Defines the interface for pushing one hostname → IP binding to the
// dynamic-DNS provider.
//
// ## Implementations
//
// - OVH-style GET protocol: `dyndns-provider-ovh` crate

use async_trait::async_trait;
use std::net::IpAddr;

use crate::domain::{Host, UpdateOutcome};

/// Trait for DNS updater implementations
///
/// One call performs one authenticated provider exchange for one host and
/// classifies the response into an [`UpdateOutcome`]. Provider rejections
/// and transport failures are part of the outcome, not errors:
/// implementations convert them to `UpdateOutcome::failure(..)` so a single
/// bad host cannot abort a reconciliation pass. An `Err` is reserved for a
/// local inability to even attempt the exchange, and is still absorbed into
/// a failed outcome by the controller.
///
/// Calls must be idempotent from the provider's point of view: re-pushing
/// an unchanged binding is answered with a no-change code and reported as
/// success.
#[async_trait]
pub trait DnsUpdater: Send + Sync {
    /// Push `ip` as the new address for `host`
    async fn update_ip(&self, host: &Host, ip: IpAddr) -> Result<UpdateOutcome, crate::Error>;
}
