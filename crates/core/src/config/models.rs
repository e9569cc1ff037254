//! Results of loading configuration files.

use rck_protocol::project_models::ProjectConfig;
use rck_protocol::value_models::Document;
use std::path::PathBuf;

/// A project file parsed both as a generic tree and as the typed schema.
///
/// # Example
///
/// ```rust,no_run
/// use rck_core::config::loader::load_project;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let project = load_project(Path::new("project.ini")).await?;
/// println!("{} covers {} years",
///          project.config.project.name,
///          project.config.analysis.years.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LoadedProject {
    /// File the project was read from.
    pub path: PathBuf,

    /// Generic tree, including any fields the schema ignores.
    pub document: Document,

    /// Typed view of the same document.
    pub config: ProjectConfig,
}

/// One file found by [`scan_dir`](super::loader::scan_dir).
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedConfig {
    pub path: PathBuf,
    pub status: ScanStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanStatus {
    /// The file parsed.
    Parsed {
        sections: usize,
        entries: usize,
        max_depth: usize,
    },
    /// The file could not be read or parsed.
    Invalid { reason: String },
}

impl ScanStatus {
    pub fn is_parsed(&self) -> bool {
        matches!(self, ScanStatus::Parsed { .. })
    }
}
