use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use sdr_discovery::{Event, EventHandler, HandlerError};

/// Records every delivered event. Clones share the log.
#[derive(Clone, Default)]
pub struct RecordingHandler {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Event>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn events(&self) -> Vec<Event> {
        self.lock().clone()
    }

    /// Events rendered as `REGISTER(id=.., host:port)` strings.
    pub fn summary(&self) -> Vec<String> {
        self.lock().iter().map(ToString::to_string).collect()
    }

    /// Drain the log, returning what was recorded since the last drain.
    pub fn take(&self) -> Vec<String> {
        self.lock().drain(..).map(|e| e.to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl EventHandler for RecordingHandler {
    fn handle(&mut self, event: &Event) -> Result<(), HandlerError> {
        self.lock().push(event.clone());
        Ok(())
    }
}

/// Accepts the first `accept` events, then rejects every later one.
/// Rejected events are not recorded.
#[derive(Clone)]
pub struct FailingHandler {
    accept: usize,
    inner: RecordingHandler,
}

impl FailingHandler {
    pub fn after(accept: usize) -> Self {
        Self {
            accept,
            inner: RecordingHandler::new(),
        }
    }

    /// Accepted events.
    pub fn recorded(&self) -> &RecordingHandler {
        &self.inner
    }
}

impl EventHandler for FailingHandler {
    fn handle(&mut self, event: &Event) -> Result<(), HandlerError> {
        if self.inner.len() >= self.accept {
            return Err(format!("handler rejected {event}").into());
        }
        self.inner.handle(event)
    }
}
