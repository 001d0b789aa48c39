//! Read-only view of the HTTP request being authorized.
//!
//! This module defines the boundary between a web framework's request type
//! and the input builder.

/// Accessors the input builder needs from the request under authorization.
///
/// Framework integrations implement this for their own request type, or
/// copy the relevant parts into a [`RequestAdapter`](super::RequestAdapter).
///
/// # Design Notes
///
/// This trait only exposes data. It does NOT:
/// - Authenticate the caller (the principal is passed separately)
/// - Decide anything (that's the policy engine's job)
///
/// # Examples
///
/// ```
/// use opa_authz::web::RequestContext;
///
/// struct MyFrameworkRequest {
///     method: String,
///     uri: String,
/// }
///
/// impl RequestContext for MyFrameworkRequest {
///     fn method(&self) -> &str { &self.method }
///     fn protocol(&self) -> &str { "HTTP/1.1" }
///     fn path(&self) -> &str { &self.uri }
///     fn remote_host(&self) -> Option<&str> { None }
///     fn remote_addr(&self) -> Option<&str> { None }
///     fn remote_port(&self) -> Option<u16> { None }
///     fn header_names(&self) -> Vec<String> { Vec::new() }
///     fn header(&self, _name: &str) -> Option<&str> { None }
/// }
/// ```
pub trait RequestContext {
    /// HTTP method, e.g. `GET`.
    fn method(&self) -> &str;

    /// Protocol string, e.g. `HTTP/1.1`.
    fn protocol(&self) -> &str;

    /// Logical path of the request, used as the resource id.
    fn path(&self) -> &str;

    /// Remote host name, if known.
    fn remote_host(&self) -> Option<&str>;

    /// Remote IP address, if known.
    fn remote_addr(&self) -> Option<&str>;

    /// Remote port, if known.
    fn remote_port(&self) -> Option<u16>;

    /// Names of all headers present on the request.
    fn header_names(&self) -> Vec<String>;

    /// Value of the named header. Multi-valued headers yield their first value.
    fn header(&self, name: &str) -> Option<&str>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRequest {
        path: String,
    }

    impl RequestContext for TestRequest {
        fn method(&self) -> &str {
            "DELETE"
        }
        fn protocol(&self) -> &str {
            "HTTP/2"
        }
        fn path(&self) -> &str {
            &self.path
        }
        fn remote_host(&self) -> Option<&str> {
            None
        }
        fn remote_addr(&self) -> Option<&str> {
            Some("198.51.100.7")
        }
        fn remote_port(&self) -> Option<u16> {
            Some(443)
        }
        fn header_names(&self) -> Vec<String> {
            vec!["Accept".to_string()]
        }
        fn header(&self, name: &str) -> Option<&str> {
            (name == "Accept").then_some("*/*")
        }
    }

    #[test]
    fn request_context_is_object_safe() {
        let req = TestRequest {
            path: "/orders/7".to_string(),
        };
        let view: &dyn RequestContext = &req;

        assert_eq!(view.method(), "DELETE");
        assert_eq!(view.path(), "/orders/7");
        assert_eq!(view.header("Accept"), Some("*/*"));
        assert!(view.header("Missing").is_none());
    }
}
