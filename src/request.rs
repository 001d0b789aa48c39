use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The authenticated principal behind a request.
///
/// Every field is optional: an authentication mechanism may know who the
/// caller is without carrying details, or carry no authorities at all. Absent
/// fields are omitted from the `subject` section of the input document rather
/// than sent as `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Principal {
    /// Identity of the principal (user name, token claims, ...)
    pub id: Option<Value>,
    /// Opaque detail blob supplied by the authentication layer
    pub details: Option<Value>,
    /// Authorities granted to the principal
    pub authorities: Option<Vec<GrantedAuthority>>,
}

impl Principal {
    /// Creates a principal with the given identity.
    pub fn new(id: impl Into<Value>) -> Self {
        Self {
            id: Some(id.into()),
            details: None,
            authorities: None,
        }
    }

    /// Sets the detail blob.
    pub fn with_details(mut self, details: impl Into<Value>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Sets the granted authorities.
    pub fn with_authorities<I, A>(mut self, authorities: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<GrantedAuthority>,
    {
        self.authorities = Some(authorities.into_iter().map(Into::into).collect());
        self
    }

    /// Returns the identity rendered as plain text, for logs and events.
    ///
    /// String identities are returned without JSON quoting.
    pub fn display_id(&self) -> Option<String> {
        self.id.as_ref().map(|id| match id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// A single authority granted to a principal, e.g. `ROLE_ADMIN`.
///
/// Serialized as `{"authority": "<name>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrantedAuthority {
    /// Authority name
    pub authority: String,
}

impl GrantedAuthority {
    /// Creates a granted authority.
    pub fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
        }
    }

    pub(crate) fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("authority".to_string(), Value::String(self.authority.clone()));
        Value::Object(map)
    }
}

impl From<&str> for GrantedAuthority {
    fn from(authority: &str) -> Self {
        GrantedAuthority::new(authority)
    }
}

impl From<String> for GrantedAuthority {
    fn from(authority: String) -> Self {
        GrantedAuthority::new(authority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn principal_builder_sets_fields() {
        let principal = Principal::new("alice")
            .with_details(json!({"session": "s-1"}))
            .with_authorities(["ROLE_USER", "ROLE_ADMIN"]);

        assert_eq!(principal.id, Some(json!("alice")));
        assert_eq!(principal.details, Some(json!({"session": "s-1"})));
        assert_eq!(principal.authorities.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn display_id_strips_string_quotes() {
        assert_eq!(Principal::new("bob").display_id().as_deref(), Some("bob"));
        assert_eq!(Principal::new(42).display_id().as_deref(), Some("42"));
        assert!(Principal::default().display_id().is_none());
    }

    #[test]
    fn granted_authority_serializes_as_object() {
        let value = GrantedAuthority::new("ROLE_USER").to_value();
        assert_eq!(value, json!({"authority": "ROLE_USER"}));
        assert_eq!(
            serde_json::to_value(GrantedAuthority::new("ROLE_USER")).unwrap(),
            value
        );
    }
}
