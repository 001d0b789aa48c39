//! Configuration for the policy engine connection and the input document.
//!
//! Values come from, in increasing precedence: compiled defaults, the
//! `OPA_URL` environment variable (URL only), then an explicit source such
//! as a YAML file or values set in code. The URL is resolved once, when the
//! HTTP client is constructed.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::audit::EventOutcome;
use crate::error::ConfigError;

/// Policy engine URL used when nothing else is configured.
pub const DEFAULT_URL: &str = "http://localhost:8181";

/// Environment variable consulted when no URL is configured explicitly.
pub const URL_ENV_VAR: &str = "OPA_URL";

/// Default `subject.type`.
pub const DEFAULT_SUBJECT_TYPE: &str = "rust_principal";

/// Default `resource.type`.
pub const DEFAULT_RESOURCE_TYPE: &str = "endpoint";

/// Default `context.type`.
pub const DEFAULT_CONTEXT_TYPE: &str = "http";

/// Default key searched in `reason_user`.
pub const DEFAULT_REASON_KEY: &str = "en";

/// Root configuration.
///
/// # Examples
///
/// ```
/// use opa_authz::OpaConfig;
///
/// let config = OpaConfig::default();
/// assert_eq!(config.request.resource.kind.as_deref(), Some("endpoint"));
/// assert_eq!(config.response.context.reason_key, "en");
/// assert!(config.authorization_event.denied.enabled);
/// assert!(!config.authorization_event.granted.enabled);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpaConfig {
    /// Base URL of the policy engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Policy path queried when no path selector picks one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Input document settings
    pub request: RequestConfig,
    /// Response interpretation settings
    pub response: ResponseConfig,
    /// Which authorization events are published
    pub authorization_event: AuthorizationEventConfig,
    /// Extra HTTP headers sent with every evaluation, e.g. `Authorization`
    pub headers: BTreeMap<String, String>,
    /// Overall timeout for one evaluation call, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl OpaConfig {
    /// Loads configuration from a YAML file layered over the defaults.
    ///
    /// `OPA_URL` fills in `url` when the file does not set it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is unreadable or malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_figment(
            Figment::from(Serialized::defaults(OpaConfig::default()))
                .merge(Env::raw().only(&[URL_ENV_VAR]).map(|_| "url".into()))
                .merge(Yaml::file(path.as_ref())),
        )
    }

    /// Extracts configuration from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        Ok(figment.extract()?)
    }

    /// Resolves the policy engine URL: explicit `url`, then `OPA_URL`, then
    /// [`DEFAULT_URL`].
    pub fn resolved_url(&self) -> String {
        resolve_url(self.url.as_deref(), std::env::var(URL_ENV_VAR).ok())
    }

    /// Returns the configured timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

fn resolve_url(explicit: Option<&str>, env: Option<String>) -> String {
    explicit
        .map(str::to_string)
        .or(env)
        .unwrap_or_else(|| DEFAULT_URL.to_string())
}

/// Input document settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    /// `subject` settings
    pub subject: SubjectConfig,
    /// `resource` settings
    pub resource: ResourceConfig,
    /// `context` settings
    pub context: ContextConfig,
}

/// `subject` section settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectConfig {
    /// Value of `subject.type`; `None` leaves the key out
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl Default for SubjectConfig {
    fn default() -> Self {
        Self {
            kind: Some(DEFAULT_SUBJECT_TYPE.to_string()),
        }
    }
}

/// `resource` section settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Value of `resource.type`; `None` leaves the key out
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            kind: Some(DEFAULT_RESOURCE_TYPE.to_string()),
        }
    }
}

/// `context` section settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Value of `context.type`; `None` leaves the key out
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            kind: Some(DEFAULT_CONTEXT_TYPE.to_string()),
        }
    }
}

/// Response interpretation settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseConfig {
    /// `context` settings
    pub context: ResponseContextConfig,
}

/// Settings for reading the response `context`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseContextConfig {
    /// Preferred `reason_user` key
    pub reason_key: String,
}

impl Default for ResponseContextConfig {
    fn default() -> Self {
        Self {
            reason_key: DEFAULT_REASON_KEY.to_string(),
        }
    }
}

/// Which authorization events are published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationEventConfig {
    /// Denied decisions (on by default)
    pub denied: EventToggle,
    /// Granted decisions (off by default)
    pub granted: EventToggle,
}

impl Default for AuthorizationEventConfig {
    fn default() -> Self {
        Self {
            denied: EventToggle { enabled: true },
            granted: EventToggle { enabled: false },
        }
    }
}

impl AuthorizationEventConfig {
    /// Returns whether events with `outcome` should be published.
    pub fn is_enabled(&self, outcome: EventOutcome) -> bool {
        match outcome {
            EventOutcome::Granted => self.granted.enabled,
            EventOutcome::Denied => self.denied.enabled,
        }
    }
}

/// On/off switch for one event kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventToggle {
    /// Whether events of this kind are published
    pub enabled: bool,
}
