//! Command handler modules for the `sdr` binary.
//!
//! Shared utilities used by multiple command paths live here.

pub mod resolve;
pub mod watch;

use std::io::Write;

use anyhow::Result;
use sdr_config::{
    load_layered_yaml, report_unused_keys, ConfigMode, DiscoveryConfig, LoadedConfig,
    UnusedKeyPolicy,
};
use sdr_discovery::{Event, EventHandler, HandlerError};
use serde_json::json;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Load layered config for `mode` and extract the discovery section.
/// Unused keys are reported as warnings, never as errors.
pub fn load_discovery_config(
    paths: &[String],
    mode: ConfigMode,
) -> Result<(LoadedConfig, DiscoveryConfig)> {
    let loaded = load_layered_yaml(paths)?;
    let report = report_unused_keys(mode, &loaded.config_json, UnusedKeyPolicy::Warn)?;
    if !report.is_clean() {
        warn!(
            mode = %report.mode,
            unused = ?report.unused_leaf_pointers,
            "config contains keys this command does not read"
        );
    }

    let dc = DiscoveryConfig::from_config_json(&loaded.config_json)?;
    info!(
        config_hash = %loaded.config_hash,
        application = %dc.application,
        registry_source = %dc.registry_source.display(),
        "config loaded"
    );
    Ok((loaded, dc))
}

/// Writes each event to stdout as one JSON object per line.
///
/// With `stamped` set, each line also carries the application and an RFC 3339
/// UTC timestamp.
pub struct JsonLinePrinter {
    application: String,
    stamped: bool,
}

impl JsonLinePrinter {
    pub fn plain(application: &str) -> Self {
        Self {
            application: application.to_string(),
            stamped: false,
        }
    }

    pub fn stamped(application: &str) -> Self {
        Self {
            application: application.to_string(),
            stamped: true,
        }
    }
}

impl EventHandler for JsonLinePrinter {
    fn handle(&mut self, event: &Event) -> Result<(), HandlerError> {
        let line = if self.stamped {
            json!({
                "ts_utc": chrono::Utc::now().to_rfc3339(),
                "application": self.application,
                "type": event.event_type,
                "endpoint": event.endpoint,
            })
        } else {
            serde_json::to_value(event)?
        };
        let mut out = std::io::stdout().lock();
        writeln!(out, "{line}")?;
        out.flush()?;
        Ok(())
    }
}
