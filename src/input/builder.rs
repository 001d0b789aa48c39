//! Assembly of the default input document from a request and its principal.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::customizer::ContextDataProvider;
use super::document::put_if_present;
use super::{keys, DecisionInput, Section};
use crate::config::RequestConfig;
use crate::request::Principal;
use crate::web::RequestContext;

/// Builds the default decision input for one request.
///
/// The builder never fails. A missing principal leaves `subject.id`,
/// `subject.details` and `subject.authorities` out of the document, and any
/// other optional value that is absent is likewise omitted rather than sent
/// as `null`.
///
/// # Examples
///
/// ```
/// use opa_authz::input::InputBuilder;
/// use opa_authz::web::RequestAdapter;
/// use opa_authz::Principal;
///
/// let builder = InputBuilder::default();
/// let request = RequestAdapter::new("GET", "/reports").with_header("Accept", "text/csv");
/// let input = builder.build(Some(&Principal::new("alice")), &request);
///
/// assert_eq!(input.subject["id"], "alice");
/// assert_eq!(input.resource["id"], "/reports");
/// assert_eq!(input.action["headers"]["Accept"], "text/csv");
/// ```
#[derive(Clone)]
pub struct InputBuilder {
    subject_type: Option<String>,
    resource_type: Option<String>,
    context_type: Option<String>,
    context_data: Option<Arc<dyn ContextDataProvider>>,
}

impl InputBuilder {
    /// Creates a builder using the configured section types.
    pub fn new(config: &RequestConfig) -> Self {
        Self {
            subject_type: config.subject.kind.clone(),
            resource_type: config.resource.kind.clone(),
            context_type: config.context.kind.clone(),
            context_data: None,
        }
    }

    /// Attaches a provider whose value is stored under `context.data`.
    pub fn with_context_data(mut self, provider: Arc<dyn ContextDataProvider>) -> Self {
        self.context_data = Some(provider);
        self
    }

    /// Builds every section of the default document.
    ///
    /// The returned document always carries a `context` section; only a
    /// context customizer can remove it.
    pub fn build(
        &self,
        principal: Option<&Principal>,
        request: &dyn RequestContext,
    ) -> DecisionInput {
        DecisionInput::new(
            self.subject(principal),
            self.resource(request),
            self.action(request),
            Some(self.context(principal, request)),
        )
    }

    /// Builds the default `subject` section.
    pub fn subject(&self, principal: Option<&Principal>) -> Section {
        let mut subject = Section::new();
        put_if_present(
            &mut subject,
            keys::SUBJECT_TYPE,
            self.subject_type.clone().map(Value::String),
        );
        if let Some(principal) = principal {
            put_if_present(&mut subject, keys::SUBJECT_ID, principal.id.clone());
            put_if_present(&mut subject, keys::SUBJECT_DETAILS, principal.details.clone());
            put_if_present(
                &mut subject,
                keys::SUBJECT_AUTHORITIES,
                principal.authorities.as_ref().map(|authorities| {
                    Value::Array(authorities.iter().map(|a| a.to_value()).collect())
                }),
            );
        }
        subject
    }

    /// Builds the default `resource` section.
    pub fn resource(&self, request: &dyn RequestContext) -> Section {
        let mut resource = Section::new();
        put_if_present(
            &mut resource,
            keys::RESOURCE_TYPE,
            self.resource_type.clone().map(Value::String),
        );
        resource.insert(
            keys::RESOURCE_ID.to_string(),
            Value::String(request.path().to_string()),
        );
        resource
    }

    /// Builds the default `action` section.
    ///
    /// Only the first value of each header is captured, and headers without
    /// a value are dropped.
    pub fn action(&self, request: &dyn RequestContext) -> Section {
        let mut headers = Section::new();
        for name in request.header_names() {
            if let Some(value) = request.header(&name) {
                let value = Value::String(value.to_string());
                headers.insert(name, value);
            }
        }

        let mut action = Section::new();
        action.insert(
            keys::ACTION_NAME.to_string(),
            Value::String(request.method().to_string()),
        );
        action.insert(
            keys::ACTION_PROTOCOL.to_string(),
            Value::String(request.protocol().to_string()),
        );
        action.insert(keys::ACTION_HEADERS.to_string(), Value::Object(headers));
        action
    }

    /// Builds the default `context` section.
    pub fn context(&self, principal: Option<&Principal>, request: &dyn RequestContext) -> Section {
        let mut context = Section::new();
        put_if_present(
            &mut context,
            keys::CONTEXT_TYPE,
            self.context_type.clone().map(Value::String),
        );
        put_if_present(
            &mut context,
            keys::CONTEXT_HOST,
            request.remote_host().map(|host| Value::String(host.to_string())),
        );
        put_if_present(
            &mut context,
            keys::CONTEXT_IP,
            request.remote_addr().map(|ip| Value::String(ip.to_string())),
        );
        put_if_present(
            &mut context,
            keys::CONTEXT_PORT,
            request.remote_port().map(Value::from),
        );
        if let Some(provider) = &self.context_data {
            context.insert(
                keys::CONTEXT_DATA.to_string(),
                provider.context_data(principal, request),
            );
        }
        context
    }
}

impl Default for InputBuilder {
    fn default() -> Self {
        Self::new(&RequestConfig::default())
    }
}

impl fmt::Debug for InputBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputBuilder")
            .field("subject_type", &self.subject_type)
            .field("resource_type", &self.resource_type)
            .field("context_type", &self.context_type)
            .field("context_data", &self.context_data.is_some())
            .finish()
    }
}
