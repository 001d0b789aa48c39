//! Error and denial types.

use std::fmt;

use thiserror::Error;

use crate::response::DecisionResponse;

/// Message used when a denial has no resolvable reason, including when the
/// policy engine produced no usable response at all.
pub const DEFAULT_DENIAL_MESSAGE: &str = "access denied by policy";

/// The denial condition raised by [`AuthorizationManager::verify`].
///
/// Every failure that reaches `verify` collapses into this one type:
/// incomplete input, a missing response and an explicit policy denial.
/// They differ only by message text and by whether a response document is
/// attached (`None` for transport and validation failures). [`DenialKind`]
/// exposes the distinction for callers that need it.
///
/// [`AuthorizationManager::verify`]: crate::AuthorizationManager::verify
#[derive(Debug, Clone, PartialEq)]
pub struct AccessDenied {
    kind: DenialKind,
    message: String,
    response: Option<DecisionResponse>,
}

impl AccessDenied {
    /// Creates a denial for input that failed validation.
    pub fn incomplete_input(err: InputError) -> Self {
        Self {
            kind: DenialKind::IncompleteInput,
            message: err.to_string(),
            response: None,
        }
    }

    /// Creates a denial for a call that yielded no response document.
    pub fn no_response() -> Self {
        Self {
            kind: DenialKind::NoResponse,
            message: DEFAULT_DENIAL_MESSAGE.to_string(),
            response: None,
        }
    }

    /// Creates a denial issued by the policy itself.
    pub fn by_policy(message: impl Into<String>, response: DecisionResponse) -> Self {
        Self {
            kind: DenialKind::Policy,
            message: message.into(),
            response: Some(response),
        }
    }

    /// Returns the human-readable denial message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the response document, present only for policy denials.
    pub fn response(&self) -> Option<&DecisionResponse> {
        self.response.as_ref()
    }

    /// Returns which failure category produced this denial.
    pub fn kind(&self) -> DenialKind {
        self.kind
    }
}

impl fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AccessDenied {}

impl From<InputError> for AccessDenied {
    fn from(err: InputError) -> Self {
        AccessDenied::incomplete_input(err)
    }
}

/// The category behind an [`AccessDenied`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialKind {
    /// The input document was missing a required key
    IncompleteInput,
    /// The transport failed, so no decision was available
    NoResponse,
    /// The policy answered `decision: false`
    Policy,
}

impl fmt::Display for DenialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialKind::IncompleteInput => write!(f, "incomplete_input"),
            DenialKind::NoResponse => write!(f, "no_response"),
            DenialKind::Policy => write!(f, "policy"),
        }
    }
}

/// Raised when the input document lacks a required key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// `<section>.<key>` is absent or null
    #[error("input must contain '{section}.{key}'")]
    Incomplete {
        /// Top-level section name (`subject`, `resource`, ...)
        section: &'static str,
        /// Key missing inside that section
        key: &'static str,
    },
}

/// Failures of the HTTP transport to the policy engine.
///
/// These never leave [`DecisionClient`](crate::client::DecisionClient); they are
/// logged and turned into "no decision available".
#[derive(Debug, Error)]
pub enum TransportError {
    /// The engine answered with a non-2xx status
    #[error("policy engine returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// Connection, DNS, TLS or timeout failure
    #[error("failed to reach policy engine: {0}")]
    Network(String),

    /// The body could not be decoded into a decision document
    #[error("malformed policy engine response: {0}")]
    Decode(String),

    /// A data-API call returned no `result`, so the policy is undefined
    #[error("policy decision at '{path}' is undefined")]
    UndefinedDecision {
        /// Policy path that was evaluated
        path: String,
    },
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => TransportError::Status {
                status,
                body: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => TransportError::Network(transport.to_string()),
        }
    }
}

/// Configuration could not be loaded or extracted.
#[derive(Debug, Error)]
#[error("invalid policy configuration: {0}")]
pub struct ConfigError(#[from] Box<figment::Error>);

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_input_message_names_section_and_key() {
        let err = InputError::Incomplete {
            section: "subject",
            key: "id",
        };
        assert_eq!(err.to_string(), "input must contain 'subject.id'");
    }

    #[test]
    fn incomplete_input_becomes_denial_without_response() {
        let denied: AccessDenied = InputError::Incomplete {
            section: "action",
            key: "name",
        }
        .into();

        assert_eq!(denied.kind(), DenialKind::IncompleteInput);
        assert_eq!(denied.message(), "input must contain 'action.name'");
        assert!(denied.response().is_none());
    }

    #[test]
    fn no_response_denial_uses_fixed_message() {
        let denied = AccessDenied::no_response();
        assert_eq!(denied.to_string(), DEFAULT_DENIAL_MESSAGE);
        assert_eq!(denied.kind(), DenialKind::NoResponse);
    }

    #[test]
    fn policy_denial_carries_response() {
        let response = DecisionResponse::new(false);
        let denied = AccessDenied::by_policy("nope", response.clone());

        assert_eq!(denied.kind(), DenialKind::Policy);
        assert_eq!(denied.response(), Some(&response));
    }

    #[test]
    fn denial_kind_display() {
        assert_eq!(DenialKind::IncompleteInput.to_string(), "incomplete_input");
        assert_eq!(DenialKind::NoResponse.to_string(), "no_response");
        assert_eq!(DenialKind::Policy.to_string(), "policy");
    }
}
