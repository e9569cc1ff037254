//! Common test utilities shared by the integration suites.
//!
//! This module provides:
//! - The embedded project fixtures
//! - Helpers for writing fixtures to temporary directories

pub mod fixtures;

pub use fixtures::*;
