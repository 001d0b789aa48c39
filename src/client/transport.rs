//! HTTP transport to an Open Policy Agent server.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::OpaConfig;
use crate::error::TransportError;
use crate::input::DecisionInput;
use crate::response::DecisionResponse;
use crate::secret::Secret;

/// Synchronous evaluation of an input document against a policy.
///
/// `path` selects the policy; `None` asks the engine for its configured
/// default decision. Implementations must be safe to share across threads.
///
/// Implemented for every
/// `Fn(Option<&str>, &DecisionInput) -> Result<DecisionResponse, TransportError>`
/// that is `Send + Sync`, which keeps test doubles short.
pub trait PolicyTransport: Send + Sync {
    /// Evaluates `input` and returns the decision document.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on network failure, a non-2xx status, or a
    /// body that is not a decision document.
    fn evaluate(
        &self,
        path: Option<&str>,
        input: &DecisionInput,
    ) -> Result<DecisionResponse, TransportError>;
}

impl<F> PolicyTransport for F
where
    F: Fn(Option<&str>, &DecisionInput) -> Result<DecisionResponse, TransportError> + Send + Sync,
{
    fn evaluate(
        &self,
        path: Option<&str>,
        input: &DecisionInput,
    ) -> Result<DecisionResponse, TransportError> {
        self(path, input)
    }
}

/// Blocking OPA REST client.
///
/// - With a path, posts `{"input": <document>}` to `<url>/v1/data/<path>`
///   and reads the decision from `result`.
/// - Without a path, posts the bare document to the default decision
///   endpoint `<url>/` and reads the decision from the body.
///
/// Timeouts are whatever the underlying agent enforces; no retries are made.
///
/// # Examples
///
/// ```no_run
/// use opa_authz::client::{OpaClient, PolicyTransport};
/// use opa_authz::input::DecisionInput;
///
/// let client = OpaClient::new("http://localhost:8181")
///     .with_header("Authorization", "Bearer supersecret");
///
/// let response = client.evaluate(Some("policy/allow"), &DecisionInput::default());
/// ```
pub struct OpaClient {
    agent: ureq::Agent,
    base_url: String,
    headers: Vec<(String, Secret<String>)>,
}

impl OpaClient {
    /// Creates a client for the engine at `base_url` with a default agent.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_agent(base_url, ureq::AgentBuilder::new().build())
    }

    /// Creates a client that sends requests through `agent`.
    pub fn with_agent(base_url: impl Into<String>, agent: ureq::Agent) -> Self {
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            headers: Vec::new(),
        }
    }

    /// Creates a client from configuration.
    ///
    /// The URL is resolved here, once: explicit `url`, then `OPA_URL`, then
    /// the compiled default.
    pub fn from_config(config: &OpaConfig) -> Self {
        let mut agent = ureq::AgentBuilder::new();
        if let Some(timeout) = config.timeout() {
            agent = agent.timeout(timeout);
        }

        let mut client = Self::with_agent(config.resolved_url(), agent.build());
        for (name, value) in &config.headers {
            client = client.with_header(name.clone(), value.clone());
        }
        client
    }

    /// Adds a header sent with every request. The value is kept redacted.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), Secret::new(value.into())));
        self
    }

    /// Returns the base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post(&self, url: &str) -> ureq::Request {
        let mut request = self
            .agent
            .post(url)
            .set("Content-Type", "application/json");
        for (name, value) in &self.headers {
            request = request.set(name, value.expose_secret());
        }
        request
    }
}

#[derive(Serialize)]
struct DataRequest<'a> {
    input: &'a DecisionInput,
}

#[derive(Deserialize)]
struct DataResponse {
    #[serde(default)]
    result: Option<DecisionResponse>,
}

impl PolicyTransport for OpaClient {
    fn evaluate(
        &self,
        path: Option<&str>,
        input: &DecisionInput,
    ) -> Result<DecisionResponse, TransportError> {
        match path {
            Some(path) => {
                let path = path.trim_matches('/');
                let url = format!("{}/v1/data/{}", self.base_url, path);
                let reply: DataResponse = self
                    .post(&url)
                    .send_json(DataRequest { input })?
                    .into_json()
                    .map_err(|err| TransportError::Decode(err.to_string()))?;
                reply.result.ok_or_else(|| TransportError::UndefinedDecision {
                    path: path.to_string(),
                })
            }
            None => {
                let url = format!("{}/", self.base_url);
                self.post(&url)
                    .send_json(input)?
                    .into_json()
                    .map_err(|err| TransportError::Decode(err.to_string()))
            }
        }
    }
}

impl fmt::Debug for OpaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaClient")
            .field("base_url", &self.base_url)
            .field("headers", &self.headers)
            .finish()
    }
}
