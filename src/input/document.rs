//! The decision input document sent to the policy engine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::keys;

/// One section of the input document: string keys to arbitrary JSON values.
///
/// Sections are deliberately untyped so customizers can add any key the
/// policy expects.
pub type Section = Map<String, Value>;

/// The four-section document a policy is evaluated against.
///
/// `subject`, `resource` and `action` are always present once built.
/// `context` is omitted entirely (not sent as `null`) when a context
/// customizer removes it.
///
/// # Examples
///
/// ```
/// use opa_authz::input::{DecisionInput, Section};
/// use serde_json::json;
///
/// let mut subject = Section::new();
/// subject.insert("type".into(), json!("user"));
/// subject.insert("id".into(), json!("alice"));
///
/// let input = DecisionInput::new(subject, Section::new(), Section::new(), None);
/// let value = input.to_value();
///
/// assert_eq!(value["subject"]["id"], "alice");
/// assert!(value.get("context").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionInput {
    /// Who is asking
    pub subject: Section,
    /// What is being accessed
    pub resource: Section,
    /// How it is being accessed
    pub action: Section,
    /// Where the request came from, if included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Section>,
}

impl DecisionInput {
    /// Assembles a document from its sections.
    pub fn new(
        subject: Section,
        resource: Section,
        action: Section,
        context: Option<Section>,
    ) -> Self {
        Self {
            subject,
            resource,
            action,
            context,
        }
    }

    /// Looks up a top-level section by name.
    ///
    /// Returns `None` for unknown names and for an omitted `context`.
    pub fn section(&self, name: &str) -> Option<&Section> {
        match name {
            keys::SUBJECT => Some(&self.subject),
            keys::RESOURCE => Some(&self.resource),
            keys::ACTION => Some(&self.action),
            keys::CONTEXT => self.context.as_ref(),
            _ => None,
        }
    }

    /// Renders the document as a JSON object.
    pub fn to_value(&self) -> Value {
        let mut root = Map::new();
        root.insert(keys::SUBJECT.to_string(), Value::Object(self.subject.clone()));
        root.insert(keys::RESOURCE.to_string(), Value::Object(self.resource.clone()));
        root.insert(keys::ACTION.to_string(), Value::Object(self.action.clone()));
        if let Some(context) = &self.context {
            root.insert(keys::CONTEXT.to_string(), Value::Object(context.clone()));
        }
        Value::Object(root)
    }
}

/// Inserts `value` under `key` only when it is present and not JSON `null`.
pub(crate) fn put_if_present(section: &mut Section, key: &str, value: Option<Value>) {
    match value {
        Some(Value::Null) | None => {}
        Some(value) => {
            section.insert(key.to_string(), value);
        }
    }
}
