//! Key names of the decision input document.

/// Top-level section holding the principal.
pub const SUBJECT: &str = "subject";
/// Top-level section holding the requested resource.
pub const RESOURCE: &str = "resource";
/// Top-level section holding the requested action.
pub const ACTION: &str = "action";
/// Optional top-level section holding connection metadata.
pub const CONTEXT: &str = "context";

/// Configured subject type.
pub const SUBJECT_TYPE: &str = "type";
/// Principal identity.
pub const SUBJECT_ID: &str = "id";
/// Principal detail blob.
pub const SUBJECT_DETAILS: &str = "details";
/// Granted authorities, as `{authority}` objects.
pub const SUBJECT_AUTHORITIES: &str = "authorities";

/// Configured resource type.
pub const RESOURCE_TYPE: &str = "type";
/// Logical request path.
pub const RESOURCE_ID: &str = "id";

/// HTTP method.
pub const ACTION_NAME: &str = "name";
/// HTTP protocol string.
pub const ACTION_PROTOCOL: &str = "protocol";
/// Single-valued request headers.
pub const ACTION_HEADERS: &str = "headers";

/// Configured context type.
pub const CONTEXT_TYPE: &str = "type";
/// Remote host name.
pub const CONTEXT_HOST: &str = "host";
/// Remote IP address.
pub const CONTEXT_IP: &str = "ip";
/// Remote port.
pub const CONTEXT_PORT: &str = "port";
/// Value supplied by a context data provider.
pub const CONTEXT_DATA: &str = "data";
