//! Discovery facade: one application, one view, one event sink.
//!
//! The facade holds no timer and no thread. The caller decides when to
//! refresh, either on a fixed cadence or when the registry client reports a
//! cache refresh through [`ServiceDiscovery::on_registry_event`].
//!
//! Every mutating operation takes `&mut self`, so at most one refresh runs
//! per instance at a time. Integrations that receive registry notifications
//! on several threads must funnel them into the single owner.

use tracing::{debug, info, warn};

use crate::{
    reconcile, DiscoveryError, EndpointView, Event, EventHandler, InstanceStatus, RegistryClient,
    RegistryError, Resolver,
};

/// Notification delivered by a registry client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryEvent {
    /// The client refreshed its local copy of the registry.
    CacheRefreshed,
    /// The local instance changed status with the registry.
    StatusChanged {
        previous: InstanceStatus,
        current: InstanceStatus,
    },
    /// Any other client notification.
    Other(String),
}

pub struct ServiceDiscovery<C> {
    application: String,
    resolver: Resolver<C>,
    view: EndpointView,
    handler: Option<Box<dyn EventHandler + Send>>,
}

impl<C: RegistryClient> ServiceDiscovery<C> {
    pub fn new(application: impl Into<String>, client: C) -> Self {
        Self {
            application: application.into(),
            resolver: Resolver::new(client),
            view: EndpointView::new(),
            handler: None,
        }
    }

    pub fn application(&self) -> &str {
        &self.application
    }

    pub fn view(&self) -> &EndpointView {
        &self.view
    }

    pub fn client(&self) -> &C {
        self.resolver.client()
    }

    pub fn client_mut(&mut self) -> &mut C {
        self.resolver.client_mut()
    }

    pub fn is_listening(&self) -> bool {
        self.handler.is_some()
    }

    /// Install `handler` as the sole event sink, replacing any previous one,
    /// then refresh once so the handler receives the initial healthy set.
    pub fn listen<H>(&mut self, handler: H) -> Result<Vec<Event>, DiscoveryError>
    where
        H: EventHandler + Send + 'static,
    {
        self.handler = Some(Box::new(handler));
        self.refresh()
    }

    /// Resolve the application and reconcile the view against the result.
    ///
    /// A resolution failure leaves the view untouched and emits nothing.
    pub fn refresh(&mut self) -> Result<Vec<Event>, DiscoveryError> {
        let Some(handler) = self.handler.as_mut() else {
            return Err(DiscoveryError::NotListening {
                application: self.application.clone(),
            });
        };

        let incoming = match self.resolver.resolve(&self.application) {
            Ok(endpoints) => endpoints,
            Err(e) => {
                warn!(application = %self.application, error = %e, "refresh skipped");
                return Err(e);
            }
        };

        let events = match reconcile(&mut self.view, &incoming, handler.as_mut()) {
            Ok(events) => events,
            Err(e) => {
                warn!(application = %self.application, error = %e, view_len = self.view.len(), "refresh aborted by handler");
                return Err(e);
            }
        };

        info!(
            application = %self.application,
            healthy = incoming.len(),
            events = events.len(),
            view_len = self.view.len(),
            "refresh complete"
        );
        Ok(events)
    }

    /// React to a registry client notification. Only
    /// [`RegistryEvent::CacheRefreshed`] triggers a refresh.
    pub fn on_registry_event(&mut self, event: &RegistryEvent) -> Result<Vec<Event>, DiscoveryError> {
        match event {
            RegistryEvent::CacheRefreshed => self.refresh(),
            other => {
                debug!(application = %self.application, ?other, "ignoring registry notification");
                Ok(Vec::new())
            }
        }
    }

    /// Release the registry client. The view is left as it is.
    pub fn stop(&mut self) -> Result<(), RegistryError> {
        info!(application = %self.application, "stopping discovery");
        self.resolver.client_mut().shutdown()
    }
}
