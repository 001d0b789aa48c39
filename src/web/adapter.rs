//! Owned request adapter for framework integrations and tests.

use super::RequestContext;

/// Framework-agnostic snapshot of an HTTP request.
///
/// `RequestAdapter` holds simple, owned data so that integration code can
/// copy what it needs out of any framework's request type. Framework-specific
/// code should implement `From<FrameworkRequest>` for `RequestAdapter`, or
/// implement [`RequestContext`] directly.
///
/// Headers are kept in insertion order and may carry no value, mirroring
/// servers that report a header name without a readable value.
///
/// # Examples
///
/// ```
/// use opa_authz::web::{RequestAdapter, RequestContext};
///
/// let request = RequestAdapter::new("GET", "/orders/42")
///     .with_protocol("HTTP/1.1")
///     .with_remote_addr("192.0.2.10")
///     .with_header("Accept", "application/json");
///
/// assert_eq!(request.method(), "GET");
/// assert_eq!(request.header("Accept"), Some("application/json"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestAdapter {
    method: String,
    protocol: String,
    path: String,
    remote_host: Option<String>,
    remote_addr: Option<String>,
    remote_port: Option<u16>,
    headers: Vec<(String, Option<String>)>,
}

impl RequestAdapter {
    /// Creates an adapter for the given method and path.
    ///
    /// The protocol defaults to `HTTP/1.1`; everything else starts empty.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            protocol: "HTTP/1.1".to_string(),
            path: path.into(),
            remote_host: None,
            remote_addr: None,
            remote_port: None,
            headers: Vec::new(),
        }
    }

    /// Sets the protocol string.
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    /// Sets the remote host name.
    pub fn with_remote_host(mut self, host: impl Into<String>) -> Self {
        self.remote_host = Some(host.into());
        self
    }

    /// Sets the remote IP address.
    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }

    /// Sets the remote port.
    pub fn with_remote_port(mut self, port: u16) -> Self {
        self.remote_port = Some(port);
        self
    }

    /// Adds a header with a value.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), Some(value.into())));
        self
    }

    /// Adds a header name that has no readable value.
    pub fn with_valueless_header(mut self, name: impl Into<String>) -> Self {
        self.headers.push((name.into(), None));
        self
    }
}

impl RequestContext for RequestAdapter {
    fn method(&self) -> &str {
        &self.method
    }

    fn protocol(&self) -> &str {
        &self.protocol
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn remote_host(&self) -> Option<&str> {
        self.remote_host.as_deref()
    }

    fn remote_addr(&self) -> Option<&str> {
        self.remote_addr.as_deref()
    }

    fn remote_port(&self) -> Option<u16> {
        self.remote_port
    }

    fn header_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.headers.len());
        for (name, _) in &self.headers {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find_map(|(n, value)| if n == name { value.as_deref() } else { None })
    }
}
