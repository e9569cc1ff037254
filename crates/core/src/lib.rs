//! # rck-core
//!
//! Core reading, writing and checking of nested INI configuration files.
//!
//! This crate provides:
//! - A parser for bracket-depth sections, lists and inline tables
//! - A writer that produces text the parser reads back unchanged
//! - Loading of reV project files into typed models
//! - Conversion, redaction and validation of loaded documents
//!
//! ## Modules
//!
//! - [`parser`]: Text to [`Document`](rck_protocol::Document)
//! - [`writer`]: Document back to text
//! - [`access`]: Typed getters and serde extraction
//! - [`config`]: File and directory loading
//! - [`convert`]: JSON, TOML and YAML rendering
//! - [`redact`]: Credential masking
//! - [`validate`]: Cross-field project checks
//! - [`init`]: Starter project templates

pub mod access;
pub mod config;
pub mod convert;
pub mod init;
pub mod parser;
pub mod redact;
pub mod validate;
pub mod writer;
