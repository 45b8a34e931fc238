// # IP Provider Port
//
// Defines the interface for discovering the caller's public IP address.
//
// ## Implementations
//
// - HTTP echo service: `dyndns-ip-http` crate
// - Future: router UPnP/NAT-PMP queries, STUN

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for public IP discovery implementations
///
/// Implementations must return a validated, canonical [`IpAddr`] (IPv4 or
/// IPv6) and must fail with [`crate::Error::Discovery`] on network failure,
/// timeout, or an unparsable response. There is no fallback address: a
/// discovery failure propagates to the caller unmodified.
#[async_trait]
pub trait IpProvider: Send + Sync {
    /// Get the current public IP address
    async fn public_ip(&self) -> Result<IpAddr, crate::Error>;
}
