//! Configuration loading and management.
//!
//! This module reads nested INI files from disk, either as generic
//! documents or as typed reV project configurations.

pub mod error;
pub mod loader;
pub mod models;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_document, load_document_with, load_project, load_project_with, scan_dir};
pub use models::{LoadedProject, ScanStatus, ScannedConfig};
