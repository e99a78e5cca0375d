use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use sdr_discovery::{RawApplication, RegistryClient, RegistryError};

#[derive(Default)]
struct State {
    applications: Vec<RawApplication>,
    failures: VecDeque<RegistryError>,
    lookups: usize,
    shutdown_calls: usize,
}

/// Registry double driven from the test body.
///
/// Clones share state, so a test keeps one handle while the discovery
/// instance owns another. Queued failures are returned by the next lookups,
/// one per call, before the snapshot is consulted again.
#[derive(Clone, Default)]
pub struct ScriptedRegistry {
    state: Arc<Mutex<State>>,
}

impl ScriptedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_applications(applications: Vec<RawApplication>) -> Self {
        let reg = Self::default();
        reg.lock().applications = applications;
        reg
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace by (case-insensitive) name.
    pub fn set_application(&self, application: RawApplication) {
        let mut st = self.lock();
        match st
            .applications
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(&application.name))
        {
            Some(slot) => *slot = application,
            None => st.applications.push(application),
        }
    }

    pub fn remove_application(&self, name: &str) {
        self.lock()
            .applications
            .retain(|a| !a.name.eq_ignore_ascii_case(name));
    }

    /// Queue `error` for the next lookup.
    pub fn fail_next(&self, error: RegistryError) {
        self.lock().failures.push_back(error);
    }

    pub fn lookups(&self) -> usize {
        self.lock().lookups
    }

    pub fn shutdown_calls(&self) -> usize {
        self.lock().shutdown_calls
    }
}

impl RegistryClient for ScriptedRegistry {
    fn get_application(&self, application: &str) -> Result<Option<RawApplication>, RegistryError> {
        let mut st = self.lock();
        st.lookups += 1;
        if st.shutdown_calls > 0 {
            return Err(RegistryError::Shutdown);
        }
        if let Some(err) = st.failures.pop_front() {
            return Err(err);
        }
        Ok(st
            .applications
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(application))
            .cloned())
    }

    fn shutdown(&mut self) -> Result<(), RegistryError> {
        self.lock().shutdown_calls += 1;
        Ok(())
    }
}
