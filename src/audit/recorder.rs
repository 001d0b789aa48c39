//! In-memory event recorder.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{AuthorizationEvent, AuthorizationEventPublisher};

/// Thread-safe in-memory recorder for authorization events.
///
/// Stores events in publication order. Meant for tests and for inspecting
/// recent decisions; it grows without bound.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use opa_authz::audit::{
///     AuthorizationEvent, AuthorizationEventPublisher, EventOutcome, EventRecorder,
/// };
///
/// let recorder = Arc::new(EventRecorder::new());
/// recorder.publish(&AuthorizationEvent::new(EventOutcome::Denied, "GET", "/admin"));
///
/// assert_eq!(recorder.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Mutex<Vec<AuthorizationEvent>>,
}

impl EventRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded events.
    pub fn events(&self) -> Vec<AuthorizationEvent> {
        self.lock().clone()
    }

    /// Returns the number of recorded events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Clears all recorded events.
    pub fn clear(&self) {
        self.lock().clear();
    }

    // Recovers from poisoning.
    fn lock(&self) -> MutexGuard<'_, Vec<AuthorizationEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AuthorizationEventPublisher for EventRecorder {
    fn publish(&self, event: &AuthorizationEvent) {
        self.lock().push(event.clone());
    }
}
