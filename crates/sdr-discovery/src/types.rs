use serde::{Deserialize, Serialize};

use crate::Endpoint;

/// Health status reported by the registry for one instance.
///
/// Only `Up` instances ever reach the reconciler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceStatus {
    Up,
    Down,
    Starting,
    OutOfService,
    Unknown,
}

impl InstanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Up => "UP",
            InstanceStatus::Down => "DOWN",
            InstanceStatus::Starting => "STARTING",
            InstanceStatus::OutOfService => "OUT_OF_SERVICE",
            InstanceStatus::Unknown => "UNKNOWN",
        }
    }

    /// Registry status strings are matched case-insensitively; anything
    /// unrecognised maps to `Unknown` rather than failing.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "UP" => InstanceStatus::Up,
            "DOWN" => InstanceStatus::Down,
            "STARTING" => InstanceStatus::Starting,
            "OUT_OF_SERVICE" => InstanceStatus::OutOfService,
            _ => InstanceStatus::Unknown,
        }
    }
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network coordinates a caller would dial: host plus effective port.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Target {
    pub host: String,
    pub port: u16,
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Register,
    Unregister,
}

/// One change a consumer must apply to its endpoint table.
///
/// Two events are equal when kind, endpoint identity and target all match.
/// Status and informational fields are not compared.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub endpoint: Endpoint,
}

impl Event {
    pub fn register(endpoint: Endpoint) -> Self {
        Self {
            event_type: EventType::Register,
            endpoint,
        }
    }

    pub fn unregister(endpoint: Endpoint) -> Self {
        Self {
            event_type: EventType::Unregister,
            endpoint,
        }
    }

    pub fn is_register(&self) -> bool {
        self.event_type == EventType::Register
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.event_type == other.event_type
            && self.endpoint == other.endpoint
            && self.endpoint.is_target_equal(&other.endpoint)
    }
}

impl Eq for Event {}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.event_type {
            EventType::Register => "REGISTER",
            EventType::Unregister => "UNREGISTER",
        };
        write!(f, "{kind}(id={}, {})", self.endpoint.id(), self.endpoint.target())
    }
}
