//! Endpoint Registry View: the endpoints currently announced to the listener.

use indexmap::IndexMap;

use crate::Endpoint;

/// Endpoints for which REGISTER was the last event emitted, keyed by identity.
///
/// Enumeration follows insertion order. A re-registered endpoint (target
/// change) moves to the end.
#[derive(Clone, Debug, Default)]
pub struct EndpointView {
    entries: IndexMap<String, Endpoint>,
}

impl EndpointView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any one endpoint matching `predicate`, or `None`.
    pub fn find<P>(&self, mut predicate: P) -> Option<&Endpoint>
    where
        P: FnMut(&Endpoint) -> bool,
    {
        self.entries.values().find(|e| predicate(e))
    }

    /// Every endpoint matching `predicate`, in view order.
    pub fn find_all<P>(&self, mut predicate: P) -> Vec<Endpoint>
    where
        P: FnMut(&Endpoint) -> bool,
    {
        self.entries
            .values()
            .filter(|e| predicate(e))
            .cloned()
            .collect()
    }

    /// Lookup by identity.
    pub fn get(&self, id: &str) -> Option<&Endpoint> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Insert `endpoint`, replacing any entry with the same identity in place.
    pub fn insert(&mut self, endpoint: Endpoint) {
        self.entries.insert(endpoint.id().to_string(), endpoint);
    }

    /// Remove the entry with `endpoint`'s identity. No-op when absent.
    pub fn remove(&mut self, endpoint: &Endpoint) -> Option<Endpoint> {
        self.entries.shift_remove(endpoint.id())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.entries.values()
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}
