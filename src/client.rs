//! Evaluation of input documents by the policy engine.
//!
//! This module provides:
//! - [`PolicyTransport`]: the seam to the engine, one call per evaluation
//! - [`OpaClient`]: the blocking HTTP implementation of that seam
//! - [`PathSelector`]: optional per-request choice of policy path
//! - [`DecisionClient`]: path selection plus transport, with every transport
//!   failure turned into "no decision"

mod decision;
mod transport;

pub use decision::{DecisionClient, PathSelector};
pub use transport::{OpaClient, PolicyTransport};
