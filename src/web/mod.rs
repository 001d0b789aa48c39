//! Web framework integration surface.
//!
//! This module provides the boundary between HTTP frameworks and the
//! authorization pipeline. It handles:
//! - Exposing the request under authorization through [`RequestContext`]
//! - An owned [`RequestAdapter`] for frameworks that prefer to copy data out
//!
//! # Design Principles
//!
//! 1. **No Framework Dependencies**: This module contains no framework-specific code.
//!    It defines interfaces that framework-specific code can implement.
//!
//! 2. **Read-Only**: The pipeline reads the request once per call and never
//!    mutates it.
//!
//! 3. **No Authentication**: The principal travels next to the request, not
//!    inside it. Authentication happens before authorization.
//!
//! # Integration Model
//!
//! Framework-specific code should:
//! 1. Implement [`RequestContext`] for its request type, or build a [`RequestAdapter`]
//! 2. Resolve the caller's [`Principal`](crate::Principal), if any
//! 3. Call [`AuthorizationManager::check`](crate::AuthorizationManager::check) or
//!    [`AuthorizationManager::verify`](crate::AuthorizationManager::verify)
//! 4. Map the outcome to a 403 (or the framework's equivalent)
//!
//! # Example Flow
//!
//! ```ignore
//! // In a framework-specific integration (e.g., axum, actix):
//! let request = RequestAdapter::from(&http_req);
//! let principal = session.principal();
//!
//! match manager.verify(principal.as_ref(), &request) {
//!     Ok(()) => next.run(http_req).await,
//!     Err(denied) => forbidden(denied.message()),
//! }
//! ```

mod adapter;
mod extract;

pub use adapter::RequestAdapter;
pub use extract::RequestContext;
