// # IP State Store Port
//
// Durable record of the last known public IP and last check time.
//
// Single-writer-per-process is assumed; implementations serialize their own
// writes so an overlapping manual trigger cannot corrupt the record
// (last-writer-wins is acceptable).

use async_trait::async_trait;
use std::net::IpAddr;

use crate::domain::IpState;

/// Trait for the singleton last-known-IP record
#[async_trait]
pub trait IpStateStore: Send + Sync {
    /// Get the stored IP address, if one was ever confirmed
    async fn get_ip(&self) -> Result<Option<IpAddr>, crate::Error>;

    /// Store a newly confirmed IP address; also bumps the last-check time
    async fn set_ip(&self, ip: IpAddr) -> Result<(), crate::Error>;

    /// Bump the last-check timestamp without touching the stored IP
    async fn update_last_check(&self) -> Result<(), crate::Error>;

    /// Read the full record (IP plus last-check time)
    async fn get_state(&self) -> Result<IpState, crate::Error>;
}
