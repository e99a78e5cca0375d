//! Typed view of the `service_discovery` section.
//!
//! Every value is read once here; callers never walk the JSON themselves.
//! Two environment variables may override the file:
//!
//! | Variable              | Overrides                              |
//! |-----------------------|----------------------------------------|
//! | `SDR_APPLICATION`     | `/service_discovery/application`       |
//! | `SDR_REGISTRY_SOURCE` | `/service_discovery/registry/source`   |

use anyhow::{bail, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_APPLICATION: &str = "SDR_APPLICATION";
pub const ENV_REGISTRY_SOURCE: &str = "SDR_REGISTRY_SOURCE";

/// Registry fetch cadence when the config does not set one.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;

const PTR_APPLICATION: &str = "/service_discovery/application";
const PTR_REGISTRY_SOURCE: &str = "/service_discovery/registry/source";
const PTR_REFRESH_INTERVAL: &str = "/service_discovery/refresh/interval_secs";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryConfig {
    /// Application whose instances are reconciled.
    pub application: String,
    /// Registry snapshot document on disk.
    pub registry_source: PathBuf,
    pub refresh_interval_secs: u64,
}

impl DiscoveryConfig {
    /// Extract from a loaded config, applying process environment overrides.
    ///
    /// # Errors
    /// `CONFIG_MISSING` when a required value is absent from both file and
    /// environment; `CONFIG_INVALID` when a value has the wrong shape.
    pub fn from_config_json(config_json: &Value) -> Result<Self> {
        Self::from_config_json_with_env(config_json, resolve_env)
    }

    /// As [`DiscoveryConfig::from_config_json`], with an explicit environment
    /// lookup.
    pub fn from_config_json_with_env<F>(config_json: &Value, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let application = match env(ENV_APPLICATION)
            .or_else(|| read_str_at(config_json, PTR_APPLICATION))
        {
            Some(v) => v,
            None => bail!(
                "CONFIG_MISSING: {} is required (or set env var '{}')",
                PTR_APPLICATION,
                ENV_APPLICATION
            ),
        };

        let registry_source = match env(ENV_REGISTRY_SOURCE)
            .or_else(|| read_str_at(config_json, PTR_REGISTRY_SOURCE))
        {
            Some(v) => PathBuf::from(v),
            None => bail!(
                "CONFIG_MISSING: {} is required (or set env var '{}')",
                PTR_REGISTRY_SOURCE,
                ENV_REGISTRY_SOURCE
            ),
        };

        let refresh_interval_secs = match config_json.pointer(PTR_REFRESH_INTERVAL) {
            None | Some(Value::Null) => DEFAULT_REFRESH_INTERVAL_SECS,
            Some(v) => match v.as_u64() {
                Some(n) if n > 0 => n,
                _ => bail!(
                    "CONFIG_INVALID: {} must be a positive integer, got {}",
                    PTR_REFRESH_INTERVAL,
                    v
                ),
            },
        };

        Ok(Self {
            application,
            registry_source,
            refresh_interval_secs,
        })
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

/// Non-blank, trimmed string at `pointer`.
fn read_str_at(config: &Value, pointer: &str) -> Option<String> {
    let s = config.pointer(pointer)?.as_str()?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Unset and blank variables both count as absent.
fn resolve_env(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}
