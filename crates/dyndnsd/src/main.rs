// # dyndnsd - dynamic DNS daemon
//
// Thin integration layer: reads configuration from the environment, wires
// the store, the IP discovery client and the provider updater into the
// update controller, and runs the scheduler until a termination signal
// arrives. All orchestration logic lives in dyndns-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Store
// - `DYNDNS_STORE_TYPE`: `file` (default) or `memory`
// - `DYNDNS_STORE_PATH`: path to the JSON store (required for `file`)
//
// ### Discovery and provider
// - `DYNDNS_DISCOVERY_URL`: IP echo service (default: https://api.ipify.org)
// - `DYNDNS_UPDATE_URL`: provider update endpoint
//   (default: https://www.ovh.com/nic/update)
// - `DYNDNS_UPDATE_SYSTEM`: system identifier sent with updates
//   (default: dyndns)
//
// ### Hosts and cadence
// - `DYNDNS_HOSTS`: seed hosts as `hostname:username:password`,
//   comma-separated; hosts already in the store are left untouched
// - `DYNDNS_UPDATE_INTERVAL`: update interval in seconds (10..=86400);
//   persisted into the store at startup when set
//
// ### Logging
// - `DYNDNS_LOG_LEVEL`: trace, debug, info (default), warn, error
//
// ## Signals
//
// SIGTERM/SIGINT stop the daemon (the in-flight cycle completes first);
// SIGHUP forces an immediate update cycle.
//
// ## Example
//
// ```bash
// export DYNDNS_STORE_PATH=/var/lib/dyndns/store.json
// export DYNDNS_HOSTS=home.example.com:nicuser:nicpass
// export DYNDNS_UPDATE_INTERVAL=300
//
// dyndnsd
// ```

use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use dyndns_core::domain::{Host, Settings};
use dyndns_core::ports::{HostAdmin, HostsRepository, IpStateStore, SettingsStore};
use dyndns_core::scheduler::{MAX_UPDATE_INTERVAL_SECS, MIN_UPDATE_INTERVAL_SECS};
use dyndns_core::{FileStore, MemoryStore, Scheduler, SchedulerHandle, UpdateController};
use dyndns_ip_http::HttpIpProvider;
use dyndns_provider_ovh::OvhUpdater;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// HTTP timeout for provider update requests
const UPDATE_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Exit codes, following systemd conventions
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// A host seeded from the environment
struct SeedHost {
    hostname: String,
    username: String,
    password: String,
}

/// Application configuration
struct Config {
    store_type: String,
    store_path: Option<String>,
    discovery_url: String,
    update_url: String,
    update_system: String,
    hosts: Vec<SeedHost>,
    update_interval: Option<u64>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            store_type: env::var("DYNDNS_STORE_TYPE").unwrap_or_else(|_| "file".to_string()),
            store_path: env::var("DYNDNS_STORE_PATH").ok(),
            discovery_url: env::var("DYNDNS_DISCOVERY_URL")
                .unwrap_or_else(|_| dyndns_ip_http::DEFAULT_DISCOVERY_URL.to_string()),
            update_url: env::var("DYNDNS_UPDATE_URL")
                .unwrap_or_else(|_| dyndns_provider_ovh::DEFAULT_BASE_URL.to_string()),
            update_system: env::var("DYNDNS_UPDATE_SYSTEM")
                .unwrap_or_else(|_| dyndns_provider_ovh::DEFAULT_SYSTEM.to_string()),
            hosts: env::var("DYNDNS_HOSTS")
                .ok()
                .map(|raw| parse_seed_hosts(&raw))
                .transpose()?
                .unwrap_or_default(),
            update_interval: env::var("DYNDNS_UPDATE_INTERVAL")
                .ok()
                .map(|s| {
                    s.parse()
                        .with_context(|| format!("DYNDNS_UPDATE_INTERVAL is not a number: {s}"))
                })
                .transpose()?,
            log_level: env::var("DYNDNS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        match self.store_type.as_str() {
            "file" | "memory" => {}
            other => anyhow::bail!(
                "DYNDNS_STORE_TYPE '{}' is not supported. Supported types: file, memory",
                other
            ),
        }

        if self.store_type == "file" {
            match self.store_path.as_deref() {
                None | Some("") => anyhow::bail!(
                    "DYNDNS_STORE_PATH is required when DYNDNS_STORE_TYPE=file. \
                    Set it via: export DYNDNS_STORE_PATH=/var/lib/dyndns/store.json"
                ),
                Some(_) => {}
            }
        }

        for url in [&self.discovery_url, &self.update_url] {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                anyhow::bail!("URL must use HTTP or HTTPS scheme. Got: {}", url);
            }
        }

        for seed in &self.hosts {
            validate_domain_name(&seed.hostname)?;
            if seed.username.is_empty() || seed.password.is_empty() {
                anyhow::bail!(
                    "host {} has empty credentials. \
                    Format: hostname:username:password",
                    seed.hostname
                );
            }
        }

        if let Some(interval) = self.update_interval
            && !(MIN_UPDATE_INTERVAL_SECS..=MAX_UPDATE_INTERVAL_SECS).contains(&interval)
        {
            anyhow::bail!(
                "DYNDNS_UPDATE_INTERVAL must be between {} and {} seconds. Got: {}",
                MIN_UPDATE_INTERVAL_SECS,
                MAX_UPDATE_INTERVAL_SECS,
                interval
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => anyhow::bail!(
                "DYNDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                other
            ),
        }

        Ok(())
    }
}

/// Parse `hostname:username:password` entries, comma-separated
fn parse_seed_hosts(raw: &str) -> Result<Vec<SeedHost>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut parts = entry.splitn(3, ':');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(hostname), Some(username), Some(password)) => Ok(SeedHost {
                    hostname: hostname.to_string(),
                    username: username.to_string(),
                    password: password.to_string(),
                }),
                _ => anyhow::bail!(
                    "DYNDNS_HOSTS entry '{}' is malformed. \
                    Format: hostname:username:password",
                    entry
                ),
            }
        })
        .collect()
}

/// Basic RFC 1035 shape check for a hostname
fn validate_domain_name(domain: &str) -> Result<()> {
    if domain.is_empty() {
        anyhow::bail!("hostname cannot be empty");
    }
    if domain.len() > 253 {
        anyhow::bail!("hostname too long: {} chars (max 253)", domain.len());
    }

    for label in domain.split('.') {
        if label.is_empty() {
            anyhow::bail!("hostname '{}' has an empty label", domain);
        }
        if label.len() > 63 {
            anyhow::bail!("hostname label too long: '{}' (max 63 chars)", label);
        }
        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            anyhow::bail!(
                "hostname label '{}' contains invalid characters (alphanumeric and hyphen only)",
                label
            );
        }
        if label.starts_with('-') || label.ends_with('-') {
            anyhow::bail!("hostname label '{}' cannot start or end with a hyphen", label);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("configuration error: {e:#}");
            return DaemonExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("configuration error: {e:#}");
        return DaemonExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set tracing subscriber: {e}");
        return DaemonExitCode::ConfigError.into();
    }

    info!("starting dyndnsd");

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to create tokio runtime: {}", e);
            return DaemonExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run_daemon(config).await {
            Ok(()) => {
                info!("clean shutdown");
                DaemonExitCode::CleanShutdown
            }
            Err(e) => {
                error!("daemon error: {:#}", e);
                DaemonExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Select the store implementation and hand off to the generic wiring
async fn run_daemon(config: Config) -> Result<()> {
    if config.store_type == "memory" {
        info!("using in-memory store");
        return run_with_store(Arc::new(MemoryStore::new()), config).await;
    }

    let path = config
        .store_path
        .clone()
        .context("store path missing after validation")?;
    let store = FileStore::open(&path).await?;
    info!("using file store at {}", path);
    run_with_store(Arc::new(store), config).await
}

/// Wire everything up around one store instance and run until a signal
async fn run_with_store<S>(store: Arc<S>, config: Config) -> Result<()>
where
    S: IpStateStore + HostsRepository + SettingsStore + HostAdmin + Send + Sync + 'static,
{
    // Seed hosts from the environment; existing entries keep their state
    for seed in &config.hosts {
        if store.get_host_by_hostname(&seed.hostname).await?.is_none() {
            info!("registering host {}", seed.hostname);
            store
                .add_host(Host::new(
                    seed.hostname.clone(),
                    seed.username.clone(),
                    seed.password.clone(),
                ))
                .await?;
        }
    }

    if let Some(interval) = config.update_interval {
        store
            .set_settings(Settings {
                update_interval_secs: interval,
            })
            .await?;
    }

    let ip_provider = Arc::new(HttpIpProvider::with_url(config.discovery_url.clone()));
    let updater = Arc::new(OvhUpdater::with_endpoint(
        config.update_url.clone(),
        config.update_system.clone(),
        UPDATE_HTTP_TIMEOUT,
    ));

    let controller = Arc::new(UpdateController::new(
        ip_provider,
        updater,
        store.clone(),
        store.clone(),
    ));

    let scheduler = Scheduler::new(controller, store.clone());
    let handle = scheduler.handle();
    let task = tokio::spawn(scheduler.run());

    let signal_name = wait_for_shutdown(handle.clone()).await?;
    info!("received {}, shutting down", signal_name);

    handle.shutdown();
    task.await.context("scheduler task panicked")?;

    Ok(())
}

/// Wait for a termination signal; SIGHUP forces an immediate cycle
#[cfg(unix)]
async fn wait_for_shutdown(handle: SchedulerHandle) -> Result<&'static str> {
    let mut sigterm =
        signal(SignalKind::terminate()).context("failed to setup SIGTERM handler")?;
    let mut sigint =
        signal(SignalKind::interrupt()).context("failed to setup SIGINT handler")?;
    let mut sighup = signal(SignalKind::hangup()).context("failed to setup SIGHUP handler")?;

    loop {
        tokio::select! {
            _ = sigterm.recv() => return Ok("SIGTERM"),
            _ = sigint.recv() => return Ok("SIGINT"),
            _ = sighup.recv() => {
                info!("SIGHUP received, forcing an update cycle");
                handle.trigger_now();
            }
        }
    }
}

/// Fallback for non-Unix platforms (CTRL-C only)
#[cfg(not(unix))]
async fn wait_for_shutdown(_handle: SchedulerHandle) -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .context("failed to wait for CTRL-C")?;
    Ok("SIGINT")
}
