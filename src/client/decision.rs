use std::fmt;
use std::sync::Arc;

use super::PolicyTransport;
use crate::input::DecisionInput;
use crate::request::Principal;
use crate::response::DecisionResponse;
use crate::web::RequestContext;

/// Chooses the policy path for one call.
///
/// Once a selector is registered it replaces the static path: returning `None`
/// asks the engine for its default decision.
///
/// Implemented for every
/// `Fn(Option<&Principal>, &dyn RequestContext, &DecisionInput) -> Option<String>`
/// that is `Send + Sync`.
pub trait PathSelector: Send + Sync {
    /// Returns the path to query for this request, if any.
    fn select_path(
        &self,
        principal: Option<&Principal>,
        request: &dyn RequestContext,
        input: &DecisionInput,
    ) -> Option<String>;
}

impl<F> PathSelector for F
where
    F: Fn(Option<&Principal>, &dyn RequestContext, &DecisionInput) -> Option<String> + Send + Sync,
{
    fn select_path(
        &self,
        principal: Option<&Principal>,
        request: &dyn RequestContext,
        input: &DecisionInput,
    ) -> Option<String> {
        self(principal, request, input)
    }
}

/// Sends input documents to a [`PolicyTransport`] and never fails.
///
/// Any transport error is logged at `error` level and reported as `None`,
/// which callers treat as a denial.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use opa_authz::client::DecisionClient;
/// use opa_authz::error::TransportError;
/// use opa_authz::input::DecisionInput;
/// use opa_authz::web::RequestAdapter;
/// use opa_authz::DecisionResponse;
///
/// let transport = |path: Option<&str>, _: &DecisionInput| {
///     Ok::<_, TransportError>(DecisionResponse::new(path == Some("policy/allow")))
/// };
/// let client = DecisionClient::new(Arc::new(transport)).with_path("policy/allow");
///
/// let request = RequestAdapter::new("GET", "/");
/// let response = client.evaluate(None, &request, &DecisionInput::default());
/// assert_eq!(response.map(|r| r.decision), Some(true));
/// ```
#[derive(Clone)]
pub struct DecisionClient {
    transport: Arc<dyn PolicyTransport>,
    path: Option<String>,
    selector: Option<Arc<dyn PathSelector>>,
}

impl DecisionClient {
    /// Creates a client that queries the engine's default decision.
    pub fn new(transport: Arc<dyn PolicyTransport>) -> Self {
        Self {
            transport,
            path: None,
            selector: None,
        }
    }

    /// Sets the static policy path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the per-request path selector.
    pub fn with_path_selector(mut self, selector: Arc<dyn PathSelector>) -> Self {
        self.selector = Some(selector);
        self
    }

    /// Resolves the path for one call.
    ///
    /// A registered selector decides alone, and its `None` means the default
    /// decision. Without a selector the static path applies.
    pub fn select_path(
        &self,
        principal: Option<&Principal>,
        request: &dyn RequestContext,
        input: &DecisionInput,
    ) -> Option<String> {
        match &self.selector {
            Some(selector) => selector.select_path(principal, request, input),
            None => self.path.clone(),
        }
    }

    /// Evaluates `input`, returning `None` if no decision could be obtained.
    pub fn evaluate(
        &self,
        principal: Option<&Principal>,
        request: &dyn RequestContext,
        input: &DecisionInput,
    ) -> Option<DecisionResponse> {
        let path = self.select_path(principal, request, input);
        match &path {
            Some(path) => tracing::trace!(path = %path, "querying policy path"),
            None => tracing::trace!("using default policy path"),
        }

        match self.transport.evaluate(path.as_deref(), input) {
            Ok(response) => {
                tracing::trace!(response = ?response, "received policy response");
                Some(response)
            }
            Err(err) => {
                tracing::error!(error = %err, path = ?path, "policy evaluation failed");
                None
            }
        }
    }
}

impl fmt::Debug for DecisionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecisionClient")
            .field("path", &self.path)
            .field("selector", &self.selector.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::web::RequestAdapter;
    use std::sync::Mutex;

    /// Records the path of every call and answers with a fixed decision.
    struct RecordingTransport {
        paths: Mutex<Vec<Option<String>>>,
        decision: bool,
    }

    impl RecordingTransport {
        fn new(decision: bool) -> Arc<Self> {
            Arc::new(Self {
                paths: Mutex::new(Vec::new()),
                decision,
            })
        }

        fn paths(&self) -> Vec<Option<String>> {
            self.paths.lock().unwrap().clone()
        }
    }

    impl PolicyTransport for RecordingTransport {
        fn evaluate(
            &self,
            path: Option<&str>,
            _input: &DecisionInput,
        ) -> Result<DecisionResponse, TransportError> {
            self.paths.lock().unwrap().push(path.map(str::to_string));
            Ok(DecisionResponse::new(self.decision))
        }
    }

    fn request() -> RequestAdapter {
        RequestAdapter::new("GET", "/orders")
    }

    #[test]
    fn no_path_configured_uses_default() {
        let transport = RecordingTransport::new(true);
        let client = DecisionClient::new(transport.clone());

        client.evaluate(None, &request(), &DecisionInput::default());
        assert_eq!(transport.paths(), vec![None]);
    }

    #[test]
    fn static_path_is_used() {
        let transport = RecordingTransport::new(true);
        let client = DecisionClient::new(transport.clone()).with_path("policy/allow");

        client.evaluate(None, &request(), &DecisionInput::default());
        assert_eq!(transport.paths(), vec![Some("policy/allow".to_string())]);
    }

    #[test]
    fn selector_overrides_static_path() {
        let transport = RecordingTransport::new(true);
        let selector = |_: Option<&Principal>,
                        request: &dyn RequestContext,
                        _: &DecisionInput|
         -> Option<String> { Some(format!("routes{}", request.path())) };
        let client = DecisionClient::new(transport.clone())
            .with_path("policy/allow")
            .with_path_selector(Arc::new(selector));

        client.evaluate(None, &request(), &DecisionInput::default());
        assert_eq!(transport.paths(), vec![Some("routes/orders".to_string())]);
    }

    #[test]
    fn selector_returning_none_uses_default_decision() {
        let transport = RecordingTransport::new(true);
        let selector = |_: Option<&Principal>,
                        _: &dyn RequestContext,
                        _: &DecisionInput|
         -> Option<String> { None };
        let client = DecisionClient::new(transport.clone())
            .with_path("policy/allow")
            .with_path_selector(Arc::new(selector));

        client.evaluate(None, &request(), &DecisionInput::default());
        assert_eq!(transport.paths(), vec![None]);
    }

    #[test]
    fn static_path_applies_without_selector() {
        let transport = RecordingTransport::new(true);
        let client = DecisionClient::new(transport.clone()).with_path("policy/allow");

        client.evaluate(None, &request(), &DecisionInput::default());
        assert_eq!(transport.paths(), vec![Some("policy/allow".to_string())]);
    }

    #[test]
    fn transport_failure_becomes_none() {
        let failing = |_: Option<&str>, _: &DecisionInput| {
            Err::<DecisionResponse, _>(TransportError::Network("connection refused".to_string()))
        };
        let client = DecisionClient::new(Arc::new(failing));

        assert!(client
            .evaluate(None, &request(), &DecisionInput::default())
            .is_none());
    }

    #[test]
    fn response_is_passed_through() {
        let client = DecisionClient::new(RecordingTransport::new(false));
        let response = client.evaluate(None, &request(), &DecisionInput::default());

        assert_eq!(response, Some(DecisionResponse::new(false)));
    }
}
