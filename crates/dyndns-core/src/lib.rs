// # dyndns-core
//
// Core library for the dyndns convergence daemon.
//
// ## Architecture Overview
//
// This library provides the update-orchestration engine that keeps a set of
// DNS hostnames pointed at the caller's current public IP:
//
// - **Ports**: [`IpProvider`], [`DnsUpdater`], [`IpStateStore`],
//   [`HostsRepository`], [`SettingsStore`]: the seams between the
//   orchestration logic and IP discovery, the provider protocol and
//   persistence
// - **UpdateController**: decides which hosts need a push (all of them on
//   an IP change, only pending ones otherwise) and reconciles host by host
// - **Scheduler**: drives the controller on a persisted, remotely
//   adjustable cadence, with a manual trigger and cooperative shutdown
// - **Stores**: bundled memory and file implementations of the persistence
//   ports, including the append-only audit trail
//
// Adapters for concrete providers and discovery services live in sibling
// crates (`dyndns-provider-ovh`, `dyndns-ip-http`); administration
// surfaces are callers of [`UpdateController`] and the ports, not part of
// this crate.

pub mod controller;
pub mod domain;
pub mod error;
pub mod ports;
pub mod scheduler;
pub mod store;

// Re-export core types for convenience
pub use controller::UpdateController;
pub use domain::{
    Credential, CycleReport, HistoryAction, HistoryEvent, Host, IpState, Settings, UpdateOutcome,
};
pub use error::{Error, Result};
pub use ports::{DnsUpdater, HostAdmin, HostsRepository, IpProvider, IpStateStore, SettingsStore};
pub use scheduler::{Scheduler, SchedulerHandle};
pub use store::{FileStore, MemoryStore};
