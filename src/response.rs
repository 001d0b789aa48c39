//! The decision document returned by the policy engine.
//!
//! The shape follows the AuthZEN evaluation response: a required boolean
//! `decision` plus an optional `context` carrying reasons and free-form data.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decision returned for one input document.
///
/// # Examples
///
/// ```
/// use opa_authz::DecisionResponse;
///
/// let response: DecisionResponse = serde_json::from_str(
///     r#"{"decision": false, "context": {"reason_user": {"en": "nope"}}}"#,
/// ).unwrap();
///
/// assert!(!response.decision);
/// assert_eq!(response.reason_for("en"), Some("nope"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResponse {
    /// Whether access is allowed
    pub decision: bool,
    /// Optional explanation and passthrough data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ResponseContext>,
}

impl DecisionResponse {
    /// Creates a response with no context.
    pub fn new(decision: bool) -> Self {
        Self {
            decision,
            context: None,
        }
    }

    /// Attaches a context.
    pub fn with_context(mut self, context: ResponseContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Selects the user-facing reason for this decision.
    ///
    /// Returns `None` when the response carries no context. See
    /// [`ResponseContext::reason_for`] for the selection rule.
    pub fn reason_for(&self, preferred_key: &str) -> Option<&str> {
        self.context
            .as_ref()
            .and_then(|context| context.reason_for(preferred_key))
    }
}

impl fmt::Display for DecisionResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DecisionResponse[decision={}", self.decision)?;
        if let Some(id) = self.context.as_ref().and_then(|c| c.id.as_deref()) {
            write!(f, ", id={}", id)?;
        }
        write!(f, "]")
    }
}

/// Optional `context` of a decision response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseContext {
    /// Identifier of the decision, for correlation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Operator-facing reasons; never surfaced in an authorization outcome
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_admin: Option<Map<String, Value>>,
    /// User-facing reasons keyed by locale or audience tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_user: Option<BTreeMap<String, String>>,
    /// Arbitrary data passed back by the policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

impl ResponseContext {
    /// Selects the user-facing reason, preferring `preferred_key`.
    ///
    /// If `reason_user` holds `preferred_key`, its value is returned.
    /// Otherwise the value under the lexicographically smallest key is
    /// returned, comparing keys by code point (case-sensitive, independent of
    /// locale). Returns `None` when `reason_user` is absent or empty.
    /// `reason_admin` is never consulted.
    pub fn reason_for(&self, preferred_key: &str) -> Option<&str> {
        let reasons = self.reason_user.as_ref()?;
        reasons
            .get(preferred_key)
            .or_else(|| reasons.values().next())
            .map(String::as_str)
    }
}
