//! Caller-supplied rewrites of individual input sections.
//!
//! Each section has one optional extension point. A customizer receives the
//! builder's default for its section and returns the replacement; the result
//! is used as-is, so a customizer that wants to keep defaults must copy them
//! into its output. Only the context customizer may return `None`, which
//! drops `context` from the document.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::Section;
use crate::request::Principal;
use crate::web::RequestContext;

/// Rewrites the `subject`, `resource` or `action` section.
///
/// Implemented for every `Fn(Option<&Principal>, &dyn RequestContext, Section) -> Section`
/// that is `Send + Sync`.
pub trait SectionCustomizer: Send + Sync {
    /// Returns the replacement for `section`.
    fn customize(
        &self,
        principal: Option<&Principal>,
        request: &dyn RequestContext,
        section: Section,
    ) -> Section;
}

impl<F> SectionCustomizer for F
where
    F: Fn(Option<&Principal>, &dyn RequestContext, Section) -> Section + Send + Sync,
{
    fn customize(
        &self,
        principal: Option<&Principal>,
        request: &dyn RequestContext,
        section: Section,
    ) -> Section {
        self(principal, request, section)
    }
}

/// Rewrites the `context` section, or removes it by returning `None`.
///
/// A returned section must still contain `type`, or validation fails.
pub trait ContextCustomizer: Send + Sync {
    /// Returns the replacement for `context`, or `None` to omit it.
    fn customize(
        &self,
        principal: Option<&Principal>,
        request: &dyn RequestContext,
        context: Section,
    ) -> Option<Section>;
}

impl<F> ContextCustomizer for F
where
    F: Fn(Option<&Principal>, &dyn RequestContext, Section) -> Option<Section> + Send + Sync,
{
    fn customize(
        &self,
        principal: Option<&Principal>,
        request: &dyn RequestContext,
        context: Section,
    ) -> Option<Section> {
        self(principal, request, context)
    }
}

/// Supplies the value stored under `context.data`.
///
/// Implemented for every `Fn(Option<&Principal>, &dyn RequestContext) -> Value`
/// that is `Send + Sync`.
pub trait ContextDataProvider: Send + Sync {
    /// Returns the data for this request.
    fn context_data(&self, principal: Option<&Principal>, request: &dyn RequestContext) -> Value;
}

impl<F> ContextDataProvider for F
where
    F: Fn(Option<&Principal>, &dyn RequestContext) -> Value + Send + Sync,
{
    fn context_data(&self, principal: Option<&Principal>, request: &dyn RequestContext) -> Value {
        self(principal, request)
    }
}

/// A [`ContextDataProvider`] that returns the same value for every request.
///
/// Useful when the extra data does not change at runtime, and in tests.
///
/// ```
/// use opa_authz::input::{ConstantContextDataProvider, ContextDataProvider};
/// use opa_authz::web::RequestAdapter;
/// use serde_json::json;
///
/// let provider = ConstantContextDataProvider::new(json!({"hello": "world"}));
/// let request = RequestAdapter::new("GET", "/");
/// assert_eq!(provider.context_data(None, &request), json!({"hello": "world"}));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantContextDataProvider {
    data: Value,
}

impl ConstantContextDataProvider {
    /// Creates a provider that always yields `data`.
    pub fn new(data: impl Into<Value>) -> Self {
        Self { data: data.into() }
    }
}

impl ContextDataProvider for ConstantContextDataProvider {
    fn context_data(&self, _principal: Option<&Principal>, _request: &dyn RequestContext) -> Value {
        self.data.clone()
    }
}

/// The registered customizers, one optional slot per section.
///
/// An empty slot is the fast path: the default section passes through
/// untouched without any call.
#[derive(Clone, Default)]
pub struct Customizers {
    pub(crate) subject: Option<Arc<dyn SectionCustomizer>>,
    pub(crate) resource: Option<Arc<dyn SectionCustomizer>>,
    pub(crate) action: Option<Arc<dyn SectionCustomizer>>,
    pub(crate) context: Option<Arc<dyn ContextCustomizer>>,
}

impl Customizers {
    /// Creates an empty set of customizers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the `subject` customizer, replacing any previous one.
    pub fn subject(mut self, customizer: impl SectionCustomizer + 'static) -> Self {
        self.subject = Some(Arc::new(customizer));
        self
    }

    /// Registers the `resource` customizer, replacing any previous one.
    pub fn resource(mut self, customizer: impl SectionCustomizer + 'static) -> Self {
        self.resource = Some(Arc::new(customizer));
        self
    }

    /// Registers the `action` customizer, replacing any previous one.
    pub fn action(mut self, customizer: impl SectionCustomizer + 'static) -> Self {
        self.action = Some(Arc::new(customizer));
        self
    }

    /// Registers the `context` customizer, replacing any previous one.
    pub fn context(mut self, customizer: impl ContextCustomizer + 'static) -> Self {
        self.context = Some(Arc::new(customizer));
        self
    }

    pub(crate) fn apply_subject(
        &self,
        principal: Option<&Principal>,
        request: &dyn RequestContext,
        section: Section,
    ) -> Section {
        apply(self.subject.as_deref(), principal, request, section)
    }

    pub(crate) fn apply_resource(
        &self,
        principal: Option<&Principal>,
        request: &dyn RequestContext,
        section: Section,
    ) -> Section {
        apply(self.resource.as_deref(), principal, request, section)
    }

    pub(crate) fn apply_action(
        &self,
        principal: Option<&Principal>,
        request: &dyn RequestContext,
        section: Section,
    ) -> Section {
        apply(self.action.as_deref(), principal, request, section)
    }

    pub(crate) fn apply_context(
        &self,
        principal: Option<&Principal>,
        request: &dyn RequestContext,
        context: Section,
    ) -> Option<Section> {
        match self.context.as_deref() {
            Some(customizer) => customizer.customize(principal, request, context),
            None => Some(context),
        }
    }
}

fn apply(
    customizer: Option<&dyn SectionCustomizer>,
    principal: Option<&Principal>,
    request: &dyn RequestContext,
    section: Section,
) -> Section {
    match customizer {
        Some(customizer) => customizer.customize(principal, request, section),
        None => section,
    }
}

impl fmt::Debug for Customizers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Customizers")
            .field("subject", &self.subject.is_some())
            .field("resource", &self.resource.is_some())
            .field("action", &self.action.is_some())
            .field("context", &self.context.is_some())
            .finish()
    }
}
