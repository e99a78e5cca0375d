//! `sdr watch`: the scheduling layer around `ServiceDiscovery`.
//!
//! One task owns the discovery instance and selects over:
//! - the refresh ticker (`service_discovery.refresh.interval_secs`)
//! - registry notifications from the snapshot watcher
//! - ctrl-c
//!
//! so refreshes never overlap.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use sdr_config::ConfigMode;
use sdr_discovery::{DiscoveryError, FileRegistry, RegistryEvent, ServiceDiscovery};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::{load_discovery_config, JsonLinePrinter};

/// How often the snapshot file's modification time is checked.
const SOURCE_POLL: Duration = Duration::from_secs(1);

pub async fn run_watch(config_paths: &[String], once: bool) -> Result<()> {
    let (loaded, dc) = load_discovery_config(config_paths, ConfigMode::Watch)?;

    let mut sd = ServiceDiscovery::new(&dc.application, FileRegistry::new(&dc.registry_source));
    let mut refreshes: u64 = 1;
    if let Err(e) = sd.listen(JsonLinePrinter::stamped(&dc.application)) {
        // The handler is installed either way; later refreshes retry.
        warn!(error = %e, "initial refresh failed");
    }

    if !once {
        let (tx, mut rx) = mpsc::channel::<RegistryEvent>(16);
        spawn_source_watcher(dc.registry_source.clone(), SOURCE_POLL, tx);

        let mut ticker = tokio::time::interval(dc.refresh_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; listen already refreshed.
        ticker.tick().await;

        info!(
            application = %dc.application,
            interval_secs = dc.refresh_interval_secs,
            config_hash = %loaded.config_hash,
            "watching"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    refreshes += 1;
                    log_refresh_error(sd.refresh());
                }
                Some(notification) = rx.recv() => {
                    debug!(?notification, "registry notification");
                    if notification == RegistryEvent::CacheRefreshed {
                        refreshes += 1;
                    }
                    log_refresh_error(sd.on_registry_event(&notification));
                }
                res = tokio::signal::ctrl_c() => {
                    res.context("install ctrl-c handler")?;
                    info!("ctrl-c received");
                    break;
                }
            }
        }
    }

    sd.stop().context("stop registry client")?;
    println!(
        "watch_stopped=true application={} refreshes={} view_len={}",
        sd.application(),
        refreshes,
        sd.view().len()
    );
    Ok(())
}

/// Failures are per refresh; the loop carries on and the next refresh retries.
fn log_refresh_error<T>(res: Result<T, DiscoveryError>) {
    if let Err(e) = res {
        warn!(error = %e, "refresh failed");
    }
}

/// Emit `CacheRefreshed` whenever the snapshot file's modification time
/// changes. Stops when the receiver is dropped.
fn spawn_source_watcher(path: PathBuf, poll: Duration, tx: mpsc::Sender<RegistryEvent>) {
    tokio::spawn(async move {
        let mut last = modified_at(&path).await;
        let mut ticker = tokio::time::interval(poll);
        loop {
            ticker.tick().await;
            let now = modified_at(&path).await;
            if now == last {
                continue;
            }
            last = now;
            if tx.send(RegistryEvent::CacheRefreshed).await.is_err() {
                break;
            }
        }
    });
}

async fn modified_at(path: &Path) -> Option<SystemTime> {
    tokio::fs::metadata(path).await.ok()?.modified().ok()
}
