//! # rck-protocol
//!
//! Shared data models for rev-config-kit.
//!
//! This crate defines the structures every other crate exchanges:
//! - The generic document tree produced by the nested INI parser
//! - The typed schema of a reV project configuration
//!
//! ## Modules
//!
//! - [`value_models`]: `Value`, `Section` and `Document`
//! - [`project_models`]: Typed project, analysis, technology and pipeline sections
//!
//! ## Design Principles
//!
//! - Minimal dependencies: only serde and indexmap
//! - No parsing logic: text handling lives in `rck-core`

pub mod project_models;
pub mod value_models;

// Re-export all public types for convenience
pub use project_models::*;
pub use value_models::*;
