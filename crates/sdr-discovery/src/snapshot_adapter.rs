//! Snapshot adapter: deserialize the registry wire format.
//!
//! # Purpose
//! The discovery server exposes its registry as JSON documents in its own
//! schema. This module defines the *raw* (wire-level) structs mirroring those
//! documents and the parsers that turn a document into a list of
//! [`RawApplication`]s. Conversion into [`crate::Endpoint`] values lives in
//! the resolver.
//!
//! # Accepted documents
//! - Full registry: `{"applications": {"application": [ ... ]}}`
//! - Single application: `{"application": {"name": ..., "instance": [ ... ]}}`
//!
//! Unknown fields are ignored so that registry additions don't break
//! deserialization.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotAdapterError {
    /// The document is not valid JSON or does not match the wire schema.
    InvalidJson(String),
    /// An application entry has an empty `name`.
    MissingApplicationName { index: usize },
}

impl std::fmt::Display for SnapshotAdapterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson(msg) => write!(f, "registry snapshot is not valid: {msg}"),
            Self::MissingApplicationName { index } => {
                write!(f, "registry application at index {index} has an empty name")
            }
        }
    }
}

impl std::error::Error for SnapshotAdapterError {}

// ---------------------------------------------------------------------------
// Raw wire-level structs
// ---------------------------------------------------------------------------

/// Port entry: `{"$": 8080, "@enabled": "true"}`.
///
/// The registry renders `@enabled` as a string; a JSON boolean is accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPort {
    #[serde(rename = "$")]
    pub value: u16,
    #[serde(rename = "@enabled", default, with = "enabled_flag")]
    pub enabled: bool,
}

impl RawPort {
    pub fn enabled(value: u16) -> Self {
        Self {
            value,
            enabled: true,
        }
    }

    pub fn disabled(value: u16) -> Self {
        Self {
            value,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

fn default_port() -> RawPort {
    RawPort::enabled(7001)
}

fn default_secure_port() -> RawPort {
    RawPort::disabled(7002)
}

fn default_status() -> String {
    "UNKNOWN".to_string()
}

/// Wire-level instance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInstance {
    #[serde(default)]
    pub instance_id: Option<String>,
    #[serde(default)]
    pub host_name: String,
    #[serde(default)]
    pub app: String,
    #[serde(default)]
    pub ip_addr: Option<String>,
    /// Status string, e.g. `"UP"`, `"DOWN"`, `"OUT_OF_SERVICE"`.
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default = "default_port")]
    pub port: RawPort,
    #[serde(default = "default_secure_port")]
    pub secure_port: RawPort,
}

impl RawInstance {
    /// Registry identity: `instanceId` when present and non-blank, otherwise
    /// the host name.
    pub fn id(&self) -> String {
        match self.instance_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => self.host_name.trim().to_string(),
        }
    }
}

/// Wire-level application: a name plus its instances in registry order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawApplication {
    pub name: String,
    #[serde(default)]
    pub instance: Vec<RawInstance>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawApplicationList {
    #[serde(default)]
    application: Vec<RawApplication>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawRegistryDocument {
    Registry { applications: RawApplicationList },
    Single { application: RawApplication },
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a registry document into its applications, in document order.
///
/// # Errors
/// [`SnapshotAdapterError::InvalidJson`] for malformed documents and
/// [`SnapshotAdapterError::MissingApplicationName`] for nameless entries.
pub fn parse_registry_json(json: &str) -> Result<Vec<RawApplication>, SnapshotAdapterError> {
    let doc: RawRegistryDocument = serde_json::from_str(json)
        .map_err(|e| SnapshotAdapterError::InvalidJson(e.to_string()))?;

    let apps = match doc {
        RawRegistryDocument::Registry { applications } => applications.application,
        RawRegistryDocument::Single { application } => vec![application],
    };

    for (index, app) in apps.iter().enumerate() {
        if app.name.trim().is_empty() {
            return Err(SnapshotAdapterError::MissingApplicationName { index });
        }
    }

    Ok(apps)
}

mod enabled_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    pub fn serialize<S: Serializer>(v: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(if *v { "true" } else { "false" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match Flag::deserialize(d)? {
            Flag::Bool(b) => b,
            Flag::Text(s) => s.trim().eq_ignore_ascii_case("true"),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
