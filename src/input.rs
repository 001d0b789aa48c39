//! Construction of the decision input document.
//!
//! This module provides:
//! - [`InputBuilder`]: default `subject`/`resource`/`action`/`context` sections
//! - [`Customizers`]: per-section caller rewrites applied after the defaults
//! - [`validate`]: required-key checks run before anything is sent
//! - [`DecisionInput`]: the document itself, as dynamically shaped JSON sections
//!
//! Documents are built fresh for every authorization call and never cached.

mod builder;
mod customizer;
mod document;
pub mod keys;
mod validator;

pub use builder::InputBuilder;
pub use customizer::{
    ConstantContextDataProvider, ContextCustomizer, ContextDataProvider, Customizers,
    SectionCustomizer,
};
pub use document::{DecisionInput, Section};
pub use validator::validate;
