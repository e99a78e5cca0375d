//! Endpoint value: one discoverable service instance.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::snapshot_adapter::RawInstance;
use crate::{DiscoveryError, InstanceStatus, Target};

/// One service instance as announced to listeners.
///
/// Equality and hashing use `id` only. Two endpoints with the same `id` are
/// the same entity whatever their target; use [`Endpoint::is_target_equal`]
/// to detect a moved instance.
///
/// Serialized as an [`EndpointRecord`]: `port` carries the effective port,
/// the registered plain port is `plain_port`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "EndpointRecord", from = "EndpointRecord")]
pub struct Endpoint {
    id: String,
    app: String,
    host: String,
    ip_addr: Option<String>,
    port: u16,
    secure_port: u16,
    secure: bool,
    status: InstanceStatus,
}

impl Endpoint {
    /// Build an endpoint from a registry instance record.
    ///
    /// # Errors
    /// [`DiscoveryError::InvalidArgument`] when the record is absent.
    pub fn from_instance(instance: Option<&RawInstance>) -> Result<Self, DiscoveryError> {
        let instance = instance.ok_or_else(|| {
            DiscoveryError::InvalidArgument("Service instance required".to_string())
        })?;

        Ok(Self {
            id: instance.id(),
            app: instance.app.trim().to_string(),
            host: instance.host_name.trim().to_string(),
            ip_addr: instance
                .ip_addr
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            port: instance.port.value,
            secure_port: instance.secure_port.value,
            secure: instance.secure_port.is_enabled(),
            status: InstanceStatus::parse(&instance.status),
        })
    }

    pub fn builder(id: impl Into<String>, host: impl Into<String>, port: u16) -> EndpointBuilder {
        EndpointBuilder {
            inner: Endpoint {
                id: id.into(),
                app: String::new(),
                host: host.into(),
                ip_addr: None,
                port,
                secure_port: 443,
                secure: false,
                status: InstanceStatus::Up,
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn ip_addr(&self) -> Option<&str> {
        self.ip_addr.as_deref()
    }

    /// Plain (non-secure) port as registered.
    pub fn plain_port(&self) -> u16 {
        self.port
    }

    pub fn secure_port(&self) -> u16 {
        self.secure_port
    }

    pub fn status(&self) -> InstanceStatus {
        self.status
    }

    pub fn is_up(&self) -> bool {
        self.status == InstanceStatus::Up
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// Secure port when the secure port is enabled, plain port otherwise.
    pub fn port(&self) -> u16 {
        if self.secure {
            self.secure_port
        } else {
            self.port
        }
    }

    pub fn target(&self) -> Target {
        Target {
            host: self.host.clone(),
            port: self.port(),
        }
    }

    /// Host and effective port match. The `secure` flag itself is not
    /// compared, so toggling it with coinciding port numbers is not a change.
    pub fn is_target_equal(&self, other: &Endpoint) -> bool {
        self.port() == other.port() && self.host == other.host
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Endpoint {}

impl Hash for Endpoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// ---------------------------------------------------------------------------
// JSON form
// ---------------------------------------------------------------------------

/// JSON shape of an [`Endpoint`] as printed to consumers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointRecord {
    pub id: String,
    pub app: String,
    pub host: String,
    pub ip_addr: Option<String>,
    /// Effective port: the one to dial.
    pub port: u16,
    pub plain_port: u16,
    pub secure_port: u16,
    pub secure: bool,
    pub status: InstanceStatus,
}

impl From<Endpoint> for EndpointRecord {
    fn from(e: Endpoint) -> Self {
        let port = e.port();
        Self {
            id: e.id,
            app: e.app,
            host: e.host,
            ip_addr: e.ip_addr,
            port,
            plain_port: e.port,
            secure_port: e.secure_port,
            secure: e.secure,
            status: e.status,
        }
    }
}

impl From<EndpointRecord> for Endpoint {
    fn from(r: EndpointRecord) -> Self {
        Self {
            id: r.id,
            app: r.app,
            host: r.host,
            ip_addr: r.ip_addr,
            port: r.plain_port,
            secure_port: r.secure_port,
            secure: r.secure,
            status: r.status,
        }
    }
}

/// Programmatic construction, used when the record does not come from a
/// registry snapshot (tests, static fixtures).
#[derive(Clone, Debug)]
pub struct EndpointBuilder {
    inner: Endpoint,
}

impl EndpointBuilder {
    pub fn app(mut self, app: impl Into<String>) -> Self {
        self.inner.app = app.into();
        self
    }

    pub fn ip_addr(mut self, ip: impl Into<String>) -> Self {
        self.inner.ip_addr = Some(ip.into());
        self
    }

    pub fn secure_port(mut self, port: u16) -> Self {
        self.inner.secure_port = port;
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.inner.secure = secure;
        self
    }

    pub fn status(mut self, status: InstanceStatus) -> Self {
        self.inner.status = status;
        self
    }

    pub fn build(self) -> Endpoint {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot_adapter::RawPort;

    fn raw(id: &str, host: &str, port: u16) -> RawInstance {
        RawInstance {
            instance_id: Some(id.to_string()),
            host_name: host.to_string(),
            app: "APP".to_string(),
            ip_addr: None,
            status: "UP".to_string(),
            port: RawPort::enabled(port),
            secure_port: RawPort::disabled(443),
        }
    }

    #[test]
    fn absent_instance_is_rejected() {
        let err = Endpoint::from_instance(None).unwrap_err();
        assert_eq!(
            err,
            DiscoveryError::InvalidArgument("Service instance required".to_string())
        );
        assert_eq!(err.to_string(), "invalid argument: Service instance required");
    }

    #[test]
    fn from_instance_copies_fields() {
        let mut r = raw("i-1", "host1", 8080);
        r.ip_addr = Some("10.0.0.1".to_string());
        let ep = Endpoint::from_instance(Some(&r)).unwrap();
        assert_eq!(ep.id(), "i-1");
        assert_eq!(ep.app(), "APP");
        assert_eq!(ep.host(), "host1");
        assert_eq!(ep.ip_addr(), Some("10.0.0.1"));
        assert_eq!(ep.port(), 8080);
        assert!(ep.is_up());
        assert!(!ep.is_secure());
    }

    #[test]
    fn up_only_when_status_is_up() {
        let mut r = raw("i-1", "host1", 80);
        r.status = "UNKNOWN".to_string();
        assert!(!Endpoint::from_instance(Some(&r)).unwrap().is_up());
        r.status = "UP".to_string();
        assert!(Endpoint::from_instance(Some(&r)).unwrap().is_up());
    }

    #[test]
    fn secure_port_selected_when_enabled() {
        let mut r = raw("i-1", "host1", 8080);
        r.secure_port = RawPort::enabled(8443);
        let ep = Endpoint::from_instance(Some(&r)).unwrap();
        assert!(ep.is_secure());
        assert_eq!(ep.port(), 8443);
        assert_eq!(ep.target().to_string(), "host1:8443");

        r.secure_port = RawPort::disabled(8443);
        let ep = Endpoint::from_instance(Some(&r)).unwrap();
        assert!(!ep.is_secure());
        assert_eq!(ep.port(), 8080);
    }

    #[test]
    fn json_port_is_the_effective_port() {
        let ep = Endpoint::builder("s", "h", 8080)
            .secure_port(8443)
            .secure(true)
            .build();
        let v = serde_json::to_value(crate::Event::register(ep.clone())).unwrap();
        assert_eq!(v["type"], "REGISTER");
        assert_eq!(v["endpoint"]["port"], 8443);
        assert_eq!(v["endpoint"]["plain_port"], 8080);
        assert_eq!(v["endpoint"]["secure_port"], 8443);
        assert_eq!(v["endpoint"]["secure"], true);

        let back: Endpoint = serde_json::from_value(v["endpoint"].clone()).unwrap();
        assert_eq!(back.plain_port(), 8080);
        assert_eq!(back.target(), ep.target());

        let plain = Endpoint::builder("p", "h", 8080).build();
        let v = serde_json::to_value(&plain).unwrap();
        assert_eq!(v["port"], 8080);
        assert_eq!(v["plain_port"], 8080);
    }

    #[test]
    fn equality_is_identity_only() {
        let a = Endpoint::builder("i-1", "host1", 80).build();
        let b = Endpoint::builder("i-1", "host2", 9090).build();
        let c = Endpoint::builder("i-2", "host1", 80).build();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn target_differs_when_host_differs() {
        let a = Endpoint::builder("i-1", "host1", 80).build();
        let b = Endpoint::builder("i-1", "host2", 80).build();
        assert!(!a.is_target_equal(&b));
    }

    #[test]
    fn target_differs_when_port_differs() {
        let a = Endpoint::builder("i-1", "host1", 80).build();
        let b = Endpoint::builder("i-1", "host1", 8080).build();
        assert!(!a.is_target_equal(&b));
    }

    #[test]
    fn target_differs_when_host_and_port_differ() {
        let a = Endpoint::builder("i-1", "host1", 80).build();
        let b = Endpoint::builder("i-1", "host2", 8080).build();
        assert!(!a.is_target_equal(&b));
    }

    #[test]
    fn target_equal_when_host_and_port_match() {
        let a = Endpoint::builder("i-1", "host1", 80).build();
        let b = Endpoint::builder("i-1", "host1", 80)
            .status(InstanceStatus::Down)
            .build();
        assert!(a.is_target_equal(&b));
    }

    #[test]
    fn secure_toggle_with_same_port_is_target_equal() {
        let plain = Endpoint::builder("i-1", "host1", 8443).build();
        let secure = Endpoint::builder("i-1", "host1", 8080)
            .secure_port(8443)
            .secure(true)
            .build();
        assert!(plain.is_target_equal(&secure));
    }
}
