//! Resolver adapter: registry snapshot -> healthy `Endpoint` list.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::snapshot_adapter::{parse_registry_json, RawApplication, SnapshotAdapterError};
use crate::{DiscoveryError, Endpoint, InstanceStatus, RegistryError};

/// The one capability the engine needs from a registry integration.
pub trait RegistryClient {
    /// Current record for `application`, or `None` when the registry does
    /// not know it.
    fn get_application(&self, application: &str) -> Result<Option<RawApplication>, RegistryError>;

    /// Release client resources. Later lookups should fail with
    /// [`RegistryError::Shutdown`].
    fn shutdown(&mut self) -> Result<(), RegistryError> {
        Ok(())
    }
}

impl<C: RegistryClient + ?Sized> RegistryClient for Box<C> {
    fn get_application(&self, application: &str) -> Result<Option<RawApplication>, RegistryError> {
        (**self).get_application(application)
    }

    fn shutdown(&mut self) -> Result<(), RegistryError> {
        (**self).shutdown()
    }
}

/// Stateless mapping from registry records to UP endpoints.
pub struct Resolver<C> {
    client: C,
}

impl<C: RegistryClient> Resolver<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    /// Healthy endpoints for `application`, in registry order.
    ///
    /// Unknown applications and applications without instances resolve to an
    /// empty list. Instances that are not UP are dropped, as are instances
    /// whose effective port is 0.
    ///
    /// # Errors
    /// [`DiscoveryError::ResolutionFailure`] when the client fails.
    pub fn resolve(&self, application: &str) -> Result<Vec<Endpoint>, DiscoveryError> {
        let app = self
            .client
            .get_application(application)
            .map_err(|e| DiscoveryError::ResolutionFailure {
                application: application.to_string(),
                reason: e.to_string(),
            })?;

        let Some(app) = app else {
            debug!(application, "application unknown to registry");
            return Ok(Vec::new());
        };

        let mut out = Vec::with_capacity(app.instance.len());
        for inst in &app.instance {
            let status = InstanceStatus::parse(&inst.status);
            if status != InstanceStatus::Up {
                debug!(application, instance = %inst.id(), %status, "skipping instance that is not UP");
                continue;
            }
            let endpoint = Endpoint::from_instance(Some(inst))?;
            if endpoint.port() == 0 {
                debug!(application, instance = %inst.id(), "skipping instance without a usable port");
                continue;
            }
            out.push(endpoint);
        }
        Ok(out)
    }
}

fn find_application<'a>(apps: &'a [RawApplication], name: &str) -> Option<&'a RawApplication> {
    apps.iter()
        .find(|a| a.name.trim().eq_ignore_ascii_case(name.trim()))
}

// ---------------------------------------------------------------------------
// StaticRegistry
// ---------------------------------------------------------------------------

/// In-memory registry. Holds a fixed snapshot that callers may edit.
#[derive(Clone, Debug, Default)]
pub struct StaticRegistry {
    applications: Vec<RawApplication>,
    shut_down: bool,
}

impl StaticRegistry {
    pub fn new(applications: Vec<RawApplication>) -> Self {
        Self {
            applications,
            shut_down: false,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotAdapterError> {
        Ok(Self::new(parse_registry_json(json)?))
    }

    /// Insert or replace the application with the same (case-insensitive) name.
    pub fn put_application(&mut self, application: RawApplication) {
        match self
            .applications
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(&application.name))
        {
            Some(slot) => *slot = application,
            None => self.applications.push(application),
        }
    }

    pub fn remove_application(&mut self, name: &str) -> Option<RawApplication> {
        let idx = self
            .applications
            .iter()
            .position(|a| a.name.eq_ignore_ascii_case(name))?;
        Some(self.applications.remove(idx))
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl RegistryClient for StaticRegistry {
    fn get_application(&self, application: &str) -> Result<Option<RawApplication>, RegistryError> {
        if self.shut_down {
            return Err(RegistryError::Shutdown);
        }
        Ok(find_application(&self.applications, application).cloned())
    }

    fn shutdown(&mut self) -> Result<(), RegistryError> {
        self.shut_down = true;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileRegistry
// ---------------------------------------------------------------------------

/// Registry backed by a snapshot document on disk, re-read on every lookup so
/// that edits to the file show up on the next refresh.
#[derive(Clone, Debug)]
pub struct FileRegistry {
    path: PathBuf,
    shut_down: bool,
}

impl FileRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            shut_down: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RegistryClient for FileRegistry {
    fn get_application(&self, application: &str) -> Result<Option<RawApplication>, RegistryError> {
        if self.shut_down {
            return Err(RegistryError::Shutdown);
        }
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            RegistryError::Unavailable(format!("read {}: {e}", self.path.display()))
        })?;
        let apps =
            parse_registry_json(&raw).map_err(|e| RegistryError::Malformed(e.to_string()))?;
        Ok(find_application(&apps, application).cloned())
    }

    fn shutdown(&mut self) -> Result<(), RegistryError> {
        self.shut_down = true;
        Ok(())
    }
}
