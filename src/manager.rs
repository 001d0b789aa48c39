//! The authorization façade: build, customize, validate, evaluate, translate.

use std::fmt;
use std::sync::Arc;

use crate::audit::{
    AuthorizationEvent, AuthorizationEventPublisher, EventOutcome, TracingEventPublisher,
};
use crate::client::{DecisionClient, OpaClient, PathSelector, PolicyTransport};
use crate::config::{AuthorizationEventConfig, OpaConfig, RequestConfig, DEFAULT_REASON_KEY};
use crate::decision::AuthorizationDecision;
use crate::error::{AccessDenied, DEFAULT_DENIAL_MESSAGE};
use crate::input::{
    self, ContextCustomizer, ContextDataProvider, Customizers, DecisionInput, InputBuilder,
    SectionCustomizer,
};
use crate::request::Principal;
use crate::response::DecisionResponse;
use crate::web::RequestContext;

/// Authorizes requests against an external policy engine.
///
/// Every call builds a fresh input document, applies the registered
/// customizers, validates the result and sends it to the engine. Nothing is
/// cached between calls, so one manager can be shared across threads.
///
/// Any failure to obtain a decision is a denial.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use opa_authz::error::TransportError;
/// use opa_authz::input::DecisionInput;
/// use opa_authz::web::RequestAdapter;
/// use opa_authz::{AuthorizationManager, DecisionResponse, Principal};
///
/// let engine = |_: Option<&str>, input: &DecisionInput| {
///     Ok::<_, TransportError>(DecisionResponse::new(input.action["name"] == "GET"))
/// };
/// let manager = AuthorizationManager::builder(Arc::new(engine)).build();
/// let alice = Principal::new("alice");
///
/// assert!(manager.verify(Some(&alice), &RequestAdapter::new("GET", "/docs")).is_ok());
/// assert!(manager.verify(Some(&alice), &RequestAdapter::new("DELETE", "/docs")).is_err());
/// ```
#[derive(Clone)]
pub struct AuthorizationManager {
    builder: InputBuilder,
    customizers: Customizers,
    client: DecisionClient,
    reason_key: String,
    events: AuthorizationEventConfig,
    publisher: Arc<dyn AuthorizationEventPublisher>,
}

impl AuthorizationManager {
    /// Starts a builder that evaluates through `transport`.
    pub fn builder(transport: Arc<dyn PolicyTransport>) -> AuthorizationManagerBuilder {
        AuthorizationManagerBuilder::new(transport)
    }

    /// Starts a builder with an [`OpaClient`] and every setting taken from
    /// `config`.
    ///
    /// Customizers, a path selector and a context data provider can still be
    /// added before building.
    pub fn from_config(config: &OpaConfig) -> AuthorizationManagerBuilder {
        AuthorizationManagerBuilder::new(Arc::new(OpaClient::from_config(config))).config(config)
    }

    /// Returns the preferred `reason_user` key.
    pub fn reason_key(&self) -> &str {
        &self.reason_key
    }

    /// Builds the input document for a request, with customizers applied.
    ///
    /// The result has not been validated.
    pub fn input(
        &self,
        principal: Option<&Principal>,
        request: &dyn RequestContext,
    ) -> DecisionInput {
        let defaults = self.builder.build(principal, request);
        let context = defaults
            .context
            .and_then(|context| self.customizers.apply_context(principal, request, context));

        DecisionInput::new(
            self.customizers
                .apply_subject(principal, request, defaults.subject),
            self.customizers
                .apply_resource(principal, request, defaults.resource),
            self.customizers
                .apply_action(principal, request, defaults.action),
            context,
        )
    }

    /// Evaluates a request and returns the raw response document.
    ///
    /// `Ok(None)` means no decision was available. No event is published.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] if the input document is incomplete; nothing
    /// is sent in that case.
    pub fn request_decision(
        &self,
        principal: Option<&Principal>,
        request: &dyn RequestContext,
    ) -> Result<Option<DecisionResponse>, AccessDenied> {
        let input = self.input(principal, request);
        if let Err(err) = input::validate(&input) {
            tracing::debug!(error = %err, path = %request.path(), "policy input rejected");
            return Err(err.into());
        }

        tracing::trace!(input = %input.to_value(), "policy input");
        Ok(self.client.evaluate(principal, request, &input))
    }

    /// Decides whether the request is allowed.
    ///
    /// A missing response yields a denied decision with no response attached.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] only if the input document is incomplete.
    pub fn check(
        &self,
        principal: Option<&Principal>,
        request: &dyn RequestContext,
    ) -> Result<AuthorizationDecision, AccessDenied> {
        let response = self.request_decision(principal, request)?;
        if response.is_none() {
            tracing::trace!(path = %request.path(), "no policy response, denying");
        }

        let decision = AuthorizationDecision::from_response(response);
        self.publish(principal, request, &decision);
        Ok(decision)
    }

    /// Requires the request to be allowed.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] when the input is incomplete, when no decision
    /// was available ([`DEFAULT_DENIAL_MESSAGE`]), or when the policy denied
    /// the request (the resolved reason, or [`DEFAULT_DENIAL_MESSAGE`] if it
    /// gave none, with the response attached).
    pub fn verify(
        &self,
        principal: Option<&Principal>,
        request: &dyn RequestContext,
    ) -> Result<(), AccessDenied> {
        let decision = self.check(principal, request)?;
        if decision.is_granted() {
            return Ok(());
        }

        match decision.into_response() {
            Some(response) => {
                let message = response
                    .reason_for(&self.reason_key)
                    .unwrap_or(DEFAULT_DENIAL_MESSAGE)
                    .to_string();
                Err(AccessDenied::by_policy(message, response))
            }
            None => Err(AccessDenied::no_response()),
        }
    }

    fn publish(
        &self,
        principal: Option<&Principal>,
        request: &dyn RequestContext,
        decision: &AuthorizationDecision,
    ) {
        let outcome = if decision.is_granted() {
            EventOutcome::Granted
        } else {
            EventOutcome::Denied
        };
        if !self.events.is_enabled(outcome) {
            return;
        }

        let mut event = AuthorizationEvent::new(outcome, request.method(), request.path());
        if let Some(id) = principal.and_then(Principal::display_id) {
            event = event.with_principal(id);
        }
        let reason = decision.response().and_then(|r| r.reason_for(&self.reason_key));
        match (reason, outcome) {
            (Some(reason), _) => event = event.with_reason(reason),
            (None, EventOutcome::Denied) => event = event.with_reason(DEFAULT_DENIAL_MESSAGE),
            (None, EventOutcome::Granted) => {}
        }
        if let Some(response) = decision.response() {
            event = event.with_response(response.clone());
        }

        tracing::trace!(outcome = %outcome, "publishing authorization event");
        self.publisher.publish(&event);
    }
}

impl fmt::Debug for AuthorizationManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationManager")
            .field("builder", &self.builder)
            .field("customizers", &self.customizers)
            .field("client", &self.client)
            .field("reason_key", &self.reason_key)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

/// Builder for [`AuthorizationManager`].
pub struct AuthorizationManagerBuilder {
    transport: Arc<dyn PolicyTransport>,
    request: RequestConfig,
    path: Option<String>,
    reason_key: String,
    events: AuthorizationEventConfig,
    selector: Option<Arc<dyn PathSelector>>,
    context_data: Option<Arc<dyn ContextDataProvider>>,
    customizers: Customizers,
    publisher: Arc<dyn AuthorizationEventPublisher>,
}

impl AuthorizationManagerBuilder {
    fn new(transport: Arc<dyn PolicyTransport>) -> Self {
        Self {
            transport,
            request: RequestConfig::default(),
            path: None,
            reason_key: DEFAULT_REASON_KEY.to_string(),
            events: AuthorizationEventConfig::default(),
            selector: None,
            context_data: None,
            customizers: Customizers::default(),
            publisher: Arc::new(TracingEventPublisher),
        }
    }

    /// Applies the section types, policy path, reason key and event toggles
    /// from `config`.
    ///
    /// Connection settings (`url`, `headers`, `timeout_ms`) belong to the
    /// transport and are not read here.
    pub fn config(mut self, config: &OpaConfig) -> Self {
        self.request = config.request.clone();
        self.path = config.path.clone();
        self.reason_key = config.response.context.reason_key.clone();
        self.events = config.authorization_event.clone();
        self
    }

    /// Sets the section `type` defaults.
    pub fn request_config(mut self, request: RequestConfig) -> Self {
        self.request = request;
        self
    }

    /// Sets the static policy path.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Overrides the preferred `reason_user` key.
    pub fn reason_key(mut self, key: impl Into<String>) -> Self {
        self.reason_key = key.into();
        self
    }

    /// Sets which outcomes are published as events.
    pub fn authorization_events(mut self, events: AuthorizationEventConfig) -> Self {
        self.events = events;
        self
    }

    /// Chooses the policy path per request, replacing the static path.
    pub fn path_selector(mut self, selector: impl PathSelector + 'static) -> Self {
        self.selector = Some(Arc::new(selector));
        self
    }

    /// Supplies `context.data`.
    pub fn context_data_provider(mut self, provider: impl ContextDataProvider + 'static) -> Self {
        self.context_data = Some(Arc::new(provider));
        self
    }

    /// Registers the `subject` customizer.
    pub fn customize_subject(mut self, customizer: impl SectionCustomizer + 'static) -> Self {
        self.customizers = self.customizers.subject(customizer);
        self
    }

    /// Registers the `resource` customizer.
    pub fn customize_resource(mut self, customizer: impl SectionCustomizer + 'static) -> Self {
        self.customizers = self.customizers.resource(customizer);
        self
    }

    /// Registers the `action` customizer.
    pub fn customize_action(mut self, customizer: impl SectionCustomizer + 'static) -> Self {
        self.customizers = self.customizers.action(customizer);
        self
    }

    /// Registers the `context` customizer.
    pub fn customize_context(mut self, customizer: impl ContextCustomizer + 'static) -> Self {
        self.customizers = self.customizers.context(customizer);
        self
    }

    /// Replaces every customizer at once.
    pub fn customizers(mut self, customizers: Customizers) -> Self {
        self.customizers = customizers;
        self
    }

    /// Sets where authorization events go. Defaults to [`TracingEventPublisher`].
    pub fn event_publisher(mut self, publisher: Arc<dyn AuthorizationEventPublisher>) -> Self {
        self.publisher = publisher;
        self
    }

    /// Builds the manager.
    pub fn build(self) -> AuthorizationManager {
        let mut builder = InputBuilder::new(&self.request);
        if let Some(provider) = self.context_data {
            builder = builder.with_context_data(provider);
        }

        let mut client = DecisionClient::new(self.transport);
        if let Some(path) = self.path {
            client = client.with_path(path);
        }
        if let Some(selector) = self.selector {
            client = client.with_path_selector(selector);
        }

        AuthorizationManager {
            builder,
            customizers: self.customizers,
            client,
            reason_key: self.reason_key,
            events: self.events,
            publisher: self.publisher,
        }
    }
}

impl fmt::Debug for AuthorizationManagerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationManagerBuilder")
            .field("request", &self.request)
            .field("path", &self.path)
            .field("reason_key", &self.reason_key)
            .field("events", &self.events)
            .field("customizers", &self.customizers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::EventRecorder;
    use crate::error::{DenialKind, TransportError};
    use crate::input::Section;
    use crate::response::ResponseContext;
    use crate::web::RequestAdapter;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Answer = Result<DecisionResponse, TransportError>;

    fn answering(response: DecisionResponse) -> Arc<dyn PolicyTransport> {
        Arc::new(move |_: Option<&str>, _: &DecisionInput| -> Answer { Ok(response.clone()) })
    }

    fn failing() -> Arc<dyn PolicyTransport> {
        Arc::new(|_: Option<&str>, _: &DecisionInput| -> Answer {
            Err(TransportError::Network("connection refused".to_string()))
        })
    }

    fn denied_with(reasons: &[(&str, &str)]) -> DecisionResponse {
        DecisionResponse::new(false).with_context(ResponseContext {
            reason_user: Some(
                reasons
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
            ..ResponseContext::default()
        })
    }

    fn request() -> RequestAdapter {
        RequestAdapter::new("GET", "/p")
    }

    #[test]
    fn granted_response_grants() {
        let manager = AuthorizationManager::builder(answering(DecisionResponse::new(true))).build();
        let principal = Principal::new("u");

        let decision = manager.check(Some(&principal), &request()).unwrap();
        assert!(decision.is_granted());
        assert!(manager.verify(Some(&principal), &request()).is_ok());
    }

    #[test]
    fn transport_failure_denies_with_default_message() {
        let manager = AuthorizationManager::builder(failing()).build();
        let principal = Principal::new("u");

        let decision = manager.check(Some(&principal), &request()).unwrap();
        assert!(!decision.is_granted());
        assert!(decision.response().is_none());

        let denied = manager.verify(Some(&principal), &request()).unwrap_err();
        assert_eq!(denied.message(), DEFAULT_DENIAL_MESSAGE);
        assert_eq!(denied.kind(), DenialKind::NoResponse);
        assert!(denied.response().is_none());
    }

    #[test]
    fn policy_denial_carries_preferred_reason() {
        let manager =
            AuthorizationManager::builder(answering(denied_with(&[("en", "nope"), ("de", "nein")])))
                .build();

        let denied = manager.verify(Some(&Principal::new("u")), &request()).unwrap_err();
        assert_eq!(denied.message(), "nope");
        assert_eq!(denied.kind(), DenialKind::Policy);
        assert!(denied.response().is_some());
    }

    #[test]
    fn reason_key_override() {
        let manager =
            AuthorizationManager::builder(answering(denied_with(&[("en", "nope"), ("de", "nein")])))
                .reason_key("de")
                .build();

        assert_eq!(manager.reason_key(), "de");
        let denied = manager.verify(Some(&Principal::new("u")), &request()).unwrap_err();
        assert_eq!(denied.message(), "nein");
    }

    #[test]
    fn denial_without_reason_uses_default_message() {
        let manager =
            AuthorizationManager::builder(answering(DecisionResponse::new(false))).build();

        let denied = manager.verify(Some(&Principal::new("u")), &request()).unwrap_err();
        assert_eq!(denied.message(), DEFAULT_DENIAL_MESSAGE);
        assert_eq!(denied.kind(), DenialKind::Policy);
    }

    #[test]
    fn missing_principal_fails_validation_before_sending() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let transport = move |_: Option<&str>, _: &DecisionInput| -> Answer {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(DecisionResponse::new(true))
        };
        let manager = AuthorizationManager::builder(Arc::new(transport)).build();

        let denied = manager.check(None, &request()).unwrap_err();
        assert_eq!(denied.message(), "input must contain 'subject.id'");
        assert_eq!(denied.kind(), DenialKind::IncompleteInput);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn stripped_subject_id_is_reported_first() {
        let manager = AuthorizationManager::builder(answering(DecisionResponse::new(true)))
            .customize_subject(|_: Option<&Principal>, _: &dyn RequestContext, mut s: Section| {
                s.remove("id");
                s
            })
            .customize_action(|_: Option<&Principal>, _: &dyn RequestContext, _: Section| {
                Section::new()
            })
            .build();

        let denied = manager.verify(Some(&Principal::new("u")), &request()).unwrap_err();
        assert_eq!(denied.message(), "input must contain 'subject.id'");
    }

    #[test]
    fn removed_context_is_not_validated_or_sent() {
        let transport = |_: Option<&str>, input: &DecisionInput| -> Answer {
            Ok(DecisionResponse::new(input.context.is_none()))
        };
        let manager = AuthorizationManager::builder(Arc::new(transport))
            .customize_context(
                |_: Option<&Principal>, _: &dyn RequestContext, _: Section| -> Option<Section> {
                    None
                },
            )
            .build();

        let principal = Principal::new("u");
        assert!(manager.input(Some(&principal), &request()).context.is_none());
        assert!(manager.verify(Some(&principal), &request()).is_ok());
    }

    #[test]
    fn context_without_type_fails_validation() {
        let manager = AuthorizationManager::builder(answering(DecisionResponse::new(true)))
            .customize_context(|_: Option<&Principal>, _: &dyn RequestContext, _: Section| {
                Some(Section::new())
            })
            .build();

        let denied = manager.check(Some(&Principal::new("u")), &request()).unwrap_err();
        assert_eq!(denied.message(), "input must contain 'context.type'");
    }

    #[test]
    fn request_decision_returns_raw_response() {
        let response = denied_with(&[("en", "nope")]);
        let manager = AuthorizationManager::builder(answering(response.clone())).build();

        assert_eq!(
            manager.request_decision(Some(&Principal::new("u")), &request()).unwrap(),
            Some(response)
        );
    }

    #[test]
    fn request_decision_without_response_is_none() {
        let manager = AuthorizationManager::builder(failing()).build();
        assert_eq!(
            manager.request_decision(Some(&Principal::new("u")), &request()).unwrap(),
            None
        );
    }

    #[test]
    fn only_denied_events_by_default() {
        let recorder = Arc::new(EventRecorder::new());
        let granting = AuthorizationManager::builder(answering(DecisionResponse::new(true)))
            .event_publisher(recorder.clone())
            .build();
        let denying = AuthorizationManager::builder(answering(denied_with(&[("en", "nope")])))
            .event_publisher(recorder.clone())
            .build();
        let principal = Principal::new("alice");

        granting.check(Some(&principal), &request()).unwrap();
        let _ = denying.verify(Some(&principal), &request());

        let events = recorder.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].outcome(), EventOutcome::Denied);
        assert_eq!(events[0].principal(), Some("alice"));
        assert_eq!(events[0].reason(), Some("nope"));
        assert_eq!(events[0].resource(), "/p");
    }

    #[test]
    fn granted_events_when_enabled() {
        let recorder = Arc::new(EventRecorder::new());
        let mut events = AuthorizationEventConfig::default();
        events.granted.enabled = true;
        events.denied.enabled = false;
        let manager = AuthorizationManager::builder(answering(DecisionResponse::new(true)))
            .authorization_events(events)
            .event_publisher(recorder.clone())
            .build();

        manager.verify(Some(&Principal::new("alice")), &request()).unwrap();

        let events = recorder.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].outcome(), EventOutcome::Granted);
        assert!(events[0].reason().is_none());
    }

    #[test]
    fn no_event_for_incomplete_input() {
        let recorder = Arc::new(EventRecorder::new());
        let manager = AuthorizationManager::builder(answering(DecisionResponse::new(true)))
            .event_publisher(recorder.clone())
            .build();

        assert!(manager.check(None, &request()).is_err());
        assert!(recorder.is_empty());
    }

    #[test]
    fn config_is_applied() {
        let mut config = OpaConfig {
            path: Some("policy/allow".to_string()),
            ..OpaConfig::default()
        };
        config.request.subject.kind = Some("svc".to_string());
        config.response.context.reason_key = "fr".to_string();

        let transport = |path: Option<&str>, input: &DecisionInput| -> Answer {
            Ok(DecisionResponse::new(
                path == Some("policy/allow") && input.subject["type"] == "svc",
            ))
        };
        let manager = AuthorizationManager::builder(Arc::new(transport))
            .config(&config)
            .build();

        assert_eq!(manager.reason_key(), "fr");
        assert!(manager.verify(Some(&Principal::new("u")), &request()).is_ok());
    }
}
