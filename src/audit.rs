//! Authorization events published after each decision.
//!
//! This module provides:
//! - `AuthorizationEvent`: what was decided, for whom, on which resource
//! - `AuthorizationEventPublisher`: the seam events are delivered through
//! - `TracingEventPublisher`: emits events as structured `tracing` records
//! - `EventRecorder`: thread-safe in-memory recorder
//!
//! Events carry only request metadata, the principal identity and the
//! user-facing reason. Headers and admin reasons are never copied in.

mod event;
mod publisher;
mod recorder;

pub use event::{AuthorizationEvent, EventOutcome};
pub use publisher::{AuthorizationEventPublisher, TracingEventPublisher};
pub use recorder::EventRecorder;
