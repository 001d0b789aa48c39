use std::fmt;

/// A wrapper that keeps credentials out of logs.
///
/// Header values sent to the policy engine (bearer tokens, API keys) are
/// held as `Secret<String>` so that the client's `Debug` output, and any
/// tracing field that captures it, prints `[REDACTED]` instead. The value is
/// only reachable through [`expose_secret`](Self::expose_secret).
///
/// # Examples
///
/// ```
/// use opa_authz::Secret;
///
/// let token = Secret::new("Bearer supersecret".to_string());
///
/// assert_eq!(format!("{:?}", token), "[REDACTED]");
/// assert_eq!(format!("{}", token), "[REDACTED]");
/// assert_eq!(token.expose_secret(), "Bearer supersecret");
/// ```
// Do NOT derive Clone, Copy or Default: a copied secret is one more place it can leak from.
pub struct Secret<T> {
    // Must stay private; a public field bypasses redaction.
    inner: T,
}

impl<T> Secret<T> {
    /// Wraps a sensitive value.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Returns the wrapped value.
    ///
    /// Never pass the result to a logging macro.
    pub fn expose_secret(&self) -> &T {
        &self.inner
    }
}

// No Deref, AsRef or Borrow: access goes through expose_secret() only.

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<T> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}
