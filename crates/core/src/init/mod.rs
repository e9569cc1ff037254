//! Initialization module for creating a starter project file.
//!
//! This module writes an embedded `project.ini` template into a directory:
//! - The full template covers every section the loader understands
//! - The minimal template keeps only the required sections
//!
//! # Example
//!
//! ```no_run
//! use rck_core::init::{InitOptions, generate_project};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = InitOptions {
//!     target_dir: PathBuf::from("."),
//!     force: false,
//!     minimal: false,
//! };
//!
//! let path = generate_project(options).await?;
//! println!("Wrote {}", path.display());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod templates;

// Re-export commonly used types for convenience
pub use error::{InitError, InitResult};
pub use generator::{generate_project, InitOptions, PROJECT_FILE};
pub use templates::{get_template, list_templates};
