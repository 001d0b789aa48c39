use std::fmt;

use crate::response::DecisionResponse;

/// Result of [`AuthorizationManager::check`](crate::AuthorizationManager::check).
///
/// Carries the full response document, when there was one, so event
/// listeners and denial handlers can inspect what the policy returned.
///
/// # Examples
///
/// ```
/// use opa_authz::{AuthorizationDecision, DecisionResponse};
///
/// let decision = AuthorizationDecision::from_response(Some(DecisionResponse::new(true)));
/// assert!(decision.is_granted());
///
/// let denied = AuthorizationDecision::from_response(None);
/// assert!(!denied.is_granted());
/// assert!(denied.response().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizationDecision {
    granted: bool,
    response: Option<DecisionResponse>,
}

impl AuthorizationDecision {
    /// Creates a decision from its parts.
    pub fn new(granted: bool, response: Option<DecisionResponse>) -> Self {
        Self { granted, response }
    }

    /// Translates a (possibly missing) response into a decision.
    ///
    /// A missing response is a denial.
    pub fn from_response(response: Option<DecisionResponse>) -> Self {
        let granted = response.as_ref().is_some_and(|r| r.decision);
        Self { granted, response }
    }

    /// Returns `true` if access is allowed.
    pub fn is_granted(&self) -> bool {
        self.granted
    }

    /// Returns the response document, if the engine produced one.
    pub fn response(&self) -> Option<&DecisionResponse> {
        self.response.as_ref()
    }

    /// Consumes the decision, returning the response document.
    pub fn into_response(self) -> Option<DecisionResponse> {
        self.response
    }
}

impl fmt::Display for AuthorizationDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthorizationDecision [granted={}, response=", self.granted)?;
        match &self.response {
            Some(response) => write!(f, "{}", response)?,
            None => write!(f, "<none>")?,
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granted_follows_decision_flag() {
        let granted = AuthorizationDecision::from_response(Some(DecisionResponse::new(true)));
        let denied = AuthorizationDecision::from_response(Some(DecisionResponse::new(false)));
        assert!(granted.is_granted());
        assert!(!denied.is_granted());
    }

    #[test]
    fn missing_response_is_denied() {
        let decision = AuthorizationDecision::from_response(None);
        assert!(!decision.is_granted());
        assert!(decision.into_response().is_none());
    }

    #[test]
    fn display_format() {
        let granted = AuthorizationDecision::from_response(Some(DecisionResponse::new(true)));
        assert_eq!(
            granted.to_string(),
            "AuthorizationDecision [granted=true, response=DecisionResponse[decision=true]]"
        );
        assert_eq!(
            AuthorizationDecision::from_response(None).to_string(),
            "AuthorizationDecision [granted=false, response=<none>]"
        );
    }
}
