//! Delivery of authorization events.

use super::AuthorizationEvent;

/// Receives authorization events.
///
/// Called synchronously on the thread that ran the authorization, once per
/// published decision. Implementations must not block for long.
pub trait AuthorizationEventPublisher: Send + Sync {
    /// Handles one event.
    fn publish(&self, event: &AuthorizationEvent);
}

/// Publishes events as structured `tracing` records under the
/// `authorization_event` target.
///
/// # Example
///
/// ```
/// use opa_authz::audit::{
///     AuthorizationEvent, AuthorizationEventPublisher, EventOutcome, TracingEventPublisher,
/// };
///
/// let event =
///     AuthorizationEvent::new(EventOutcome::Denied, "GET", "/admin").with_principal("bob");
/// TracingEventPublisher.publish(&event);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventPublisher;

impl AuthorizationEventPublisher for TracingEventPublisher {
    fn publish(&self, event: &AuthorizationEvent) {
        tracing::info!(
            target: "authorization_event",
            outcome = %event.outcome(),
            method = %event.method(),
            resource = %event.resource(),
            principal = ?event.principal(),
            reason = ?event.reason(),
            decision_id = ?event
                .response()
                .and_then(|r| r.context.as_ref())
                .and_then(|c| c.id.as_deref()),
            "authorization event"
        );
    }
}
