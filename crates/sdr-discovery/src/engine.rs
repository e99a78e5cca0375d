use std::collections::HashSet;

use tracing::debug;

use crate::{DiscoveryError, Endpoint, EndpointView, Event, EventType};

/// Error type a handler may return. Carried into
/// [`DiscoveryError::Listener`] as text.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Sink for reconciliation events. Called synchronously, once per event.
///
/// A handler must not trigger a nested refresh on the discovery instance that
/// is calling it.
pub trait EventHandler {
    fn handle(&mut self, event: &Event) -> Result<(), HandlerError>;
}

impl<F> EventHandler for F
where
    F: FnMut(&Event) -> Result<(), HandlerError>,
{
    fn handle(&mut self, event: &Event) -> Result<(), HandlerError> {
        self(event)
    }
}

/// Apply the event's mutation to the view, then deliver it.
fn emit<H>(
    view: &mut EndpointView,
    event: Event,
    handler: &mut H,
    emitted: &mut Vec<Event>,
) -> Result<(), DiscoveryError>
where
    H: EventHandler + ?Sized,
{
    match event.event_type {
        EventType::Register => view.insert(event.endpoint.clone()),
        EventType::Unregister => {
            view.remove(&event.endpoint);
        }
    }
    debug!(%event, view_len = view.len(), "emitting discovery event");

    handler
        .handle(&event)
        .map_err(|e| DiscoveryError::Listener {
            event: event.to_string(),
            reason: e.to_string(),
        })?;
    emitted.push(event);
    Ok(())
}

/// Reconcile `view` against a freshly resolved endpoint list.
///
/// Pass 1 walks `incoming` in order:
/// - unknown identity => REGISTER
/// - known identity, different target => UNREGISTER(old) then REGISTER(new)
/// - known identity, same target => nothing
///
/// Pass 2 unregisters, in view order, every endpoint whose identity is absent
/// from `incoming`.
///
/// Each event's view mutation happens before it is delivered and before the
/// next event is computed. A handler error stops reconciliation; mutations
/// for events already produced are kept.
///
/// Returns the delivered events in emission order.
pub fn reconcile<H>(
    view: &mut EndpointView,
    incoming: &[Endpoint],
    handler: &mut H,
) -> Result<Vec<Event>, DiscoveryError>
where
    H: EventHandler + ?Sized,
{
    let mut emitted: Vec<Event> = Vec::new();

    // 1) Incoming endpoints
    for new_ep in incoming {
        let old_ep = view.get(new_ep.id()).cloned();
        match old_ep {
            None => emit(view, Event::register(new_ep.clone()), handler, &mut emitted)?,
            Some(old_ep) if !new_ep.is_target_equal(&old_ep) => {
                emit(view, Event::unregister(old_ep), handler, &mut emitted)?;
                emit(view, Event::register(new_ep.clone()), handler, &mut emitted)?;
            }
            Some(_) => {}
        }
    }

    // 2) Vanished endpoints, compared by identity.
    let incoming_ids: HashSet<&str> = incoming.iter().map(Endpoint::id).collect();
    let vanished = view.find_all(|e| !incoming_ids.contains(e.id()));
    for old_ep in vanished {
        emit(view, Event::unregister(old_ep), handler, &mut emitted)?;
    }

    Ok(emitted)
}
