//! Test doubles and fixture builders for discovery scenarios.
//!
//! Nothing here is meant for production builds.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sdr_discovery::{RawApplication, RawInstance, RawPort};
use serde_json::json;

mod handler;
mod registry;

pub use handler::{FailingHandler, RecordingHandler};
pub use registry::ScriptedRegistry;

// ---------------------------------------------------------------------------
// Fixture builders
// ---------------------------------------------------------------------------

/// UP instance with `id`, plain port enabled, secure port 443 disabled.
pub fn up_instance(id: &str, host: &str, port: u16) -> RawInstance {
    RawInstance {
        instance_id: Some(id.to_string()),
        host_name: host.to_string(),
        app: String::new(),
        ip_addr: None,
        status: "UP".to_string(),
        port: RawPort::enabled(port),
        secure_port: RawPort::disabled(443),
    }
}

/// Same as [`up_instance`] with a different status string.
pub fn instance_with_status(id: &str, host: &str, port: u16, status: &str) -> RawInstance {
    RawInstance {
        status: status.to_string(),
        ..up_instance(id, host, port)
    }
}

/// UP instance whose secure port is enabled, so the secure port is the
/// effective one.
pub fn secure_instance(id: &str, host: &str, port: u16, secure_port: u16) -> RawInstance {
    RawInstance {
        secure_port: RawPort::enabled(secure_port),
        ..up_instance(id, host, port)
    }
}

/// Application record; each instance's `app` is set to `name`.
pub fn application(name: &str, instances: Vec<RawInstance>) -> RawApplication {
    RawApplication {
        name: name.to_string(),
        instance: instances
            .into_iter()
            .map(|i| RawInstance {
                app: name.to_string(),
                ..i
            })
            .collect(),
    }
}

/// Render applications as a full registry document.
pub fn registry_json(apps: &[RawApplication]) -> String {
    json!({ "applications": { "application": apps } }).to_string()
}

/// Write a registry document for `apps` to `dir/name` and return its path.
pub fn write_registry_file(dir: &Path, name: &str, apps: &[RawApplication]) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, registry_json(apps))
        .with_context(|| format!("write registry fixture: {}", path.display()))?;
    Ok(path)
}

/// Fresh temp dir for file-backed fixtures. Dropped with the returned guard.
pub fn fixture_dir() -> Result<tempfile::TempDir> {
    tempfile::tempdir().context("create fixture dir")
}
