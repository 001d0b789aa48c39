//! Authorization event schema.

use std::fmt;

use crate::response::DecisionResponse;

/// Outcome recorded in an [`AuthorizationEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The policy allowed the request
    Granted,
    /// The policy denied the request, or no decision was available
    Denied,
}

impl fmt::Display for EventOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventOutcome::Granted => write!(f, "granted"),
            EventOutcome::Denied => write!(f, "denied"),
        }
    }
}

/// One authorization decision, as seen by event listeners.
///
/// # Example
///
/// ```
/// use opa_authz::audit::{AuthorizationEvent, EventOutcome};
///
/// let event = AuthorizationEvent::new(EventOutcome::Denied, "DELETE", "/users/42")
///     .with_principal("alice")
///     .with_reason("only admins may delete users");
///
/// assert_eq!(event.principal(), Some("alice"));
/// assert_eq!(
///     event.to_string(),
///     "AuthorizationEvent[outcome=denied, method=DELETE, resource=/users/42, \
///      principal=alice, reason=only admins may delete users]"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizationEvent {
    outcome: EventOutcome,
    method: String,
    resource: String,
    /// None for anonymous requests
    principal: Option<String>,
    reason: Option<String>,
    response: Option<DecisionResponse>,
}

impl AuthorizationEvent {
    /// Creates an event with the required fields.
    pub fn new(
        outcome: EventOutcome,
        method: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            outcome,
            method: method.into(),
            resource: resource.into(),
            principal: None,
            reason: None,
            response: None,
        }
    }

    /// Sets the principal identity.
    pub fn with_principal(mut self, principal: impl Into<String>) -> Self {
        self.principal = Some(principal.into());
        self
    }

    /// Sets the user-facing reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the response document.
    pub fn with_response(mut self, response: DecisionResponse) -> Self {
        self.response = Some(response);
        self
    }

    /// Returns the outcome.
    pub fn outcome(&self) -> EventOutcome {
        self.outcome
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the resource path.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Returns the principal identity, if any.
    pub fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }

    /// Returns the reason, if any.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Returns the response document, if the engine produced one.
    pub fn response(&self) -> Option<&DecisionResponse> {
        self.response.as_ref()
    }
}

impl fmt::Display for AuthorizationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AuthorizationEvent[outcome={}, method={}, resource={}, principal={}",
            self.outcome,
            self.method,
            self.resource,
            self.principal.as_deref().unwrap_or("<none>")
        )?;
        if let Some(reason) = &self.reason {
            write!(f, ", reason={}", reason)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_display() {
        assert_eq!(EventOutcome::Granted.to_string(), "granted");
        assert_eq!(EventOutcome::Denied.to_string(), "denied");
    }

    #[test]
    fn minimal_event() {
        let event = AuthorizationEvent::new(EventOutcome::Granted, "GET", "/health");

        assert_eq!(event.outcome(), EventOutcome::Granted);
        assert_eq!(event.method(), "GET");
        assert_eq!(event.resource(), "/health");
        assert!(event.principal().is_none());
        assert!(event.reason().is_none());
        assert!(event.response().is_none());
    }

    #[test]
    fn anonymous_event_display() {
        let event = AuthorizationEvent::new(EventOutcome::Denied, "POST", "/orders");
        assert_eq!(
            event.to_string(),
            "AuthorizationEvent[outcome=denied, method=POST, resource=/orders, principal=<none>]"
        );
    }

    #[test]
    fn response_is_attached() {
        let event = AuthorizationEvent::new(EventOutcome::Denied, "GET", "/")
            .with_response(DecisionResponse::new(false));

        assert_eq!(event.response(), Some(&DecisionResponse::new(false)));
    }
}
