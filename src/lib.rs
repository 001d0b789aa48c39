//! Request authorization backed by an Open Policy Agent server.
//!
//! For every request this crate builds a four-section input document
//! (`subject`, `resource`, `action`, `context`), lets the caller rewrite
//! any section, checks that the required keys are present, asks the policy
//! engine for a decision and turns the answer into grant or deny:
//! - **Default-deny**: a network failure, a bad status or an undecodable
//!   answer is a denial, never an error escaping to the caller
//! - **Fail fast**: incomplete input is rejected before anything is sent
//! - **Reasons**: a denial carries the policy's user-facing reason, chosen by
//!   a preferred key with a deterministic fallback
//!
//! # Core Types
//!
//! - [`AuthorizationManager`]: the `check` / `verify` entry point
//! - [`input::InputBuilder`] and [`input::Customizers`]: the input document
//! - [`client::OpaClient`]: the HTTP transport
//! - [`DecisionResponse`]: the engine's answer
//! - [`AccessDenied`]: the single denial condition
//! - [`OpaConfig`]: YAML/environment configuration
//!
//! # Examples
//!
//! ```no_run
//! use opa_authz::web::RequestAdapter;
//! use opa_authz::{AuthorizationManager, OpaConfig, Principal};
//!
//! let config = OpaConfig {
//!     path: Some("httpapi/authz/allow".to_string()),
//!     ..OpaConfig::default()
//! };
//! let manager = AuthorizationManager::from_config(&config).build();
//!
//! let request = RequestAdapter::new("GET", "/finance/salary/alice")
//!     .with_header("Authorization", "Bearer abc");
//! let alice = Principal::new("alice").with_authorities(["ROLE_USER"]);
//!
//! match manager.verify(Some(&alice), &request) {
//!     Ok(()) => println!("allowed"),
//!     Err(denied) => println!("denied: {}", denied),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
pub mod client;
pub mod config;
mod decision;
pub mod error;
pub mod input;
mod manager;
mod request;
mod response;
mod secret;
pub mod web;

pub use config::OpaConfig;
pub use decision::AuthorizationDecision;
pub use error::{
    AccessDenied, ConfigError, DenialKind, InputError, TransportError, DEFAULT_DENIAL_MESSAGE,
};
pub use manager::{AuthorizationManager, AuthorizationManagerBuilder};
pub use request::{GrantedAuthority, Principal};
pub use response::{DecisionResponse, ResponseContext};
pub use secret::Secret;
