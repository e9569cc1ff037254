//! Configuration file loader for nested INI project files.
//!
//! This module provides functionality to:
//! - Read one file as a generic [`Document`]
//! - Read one file as a typed [`ProjectConfig`]
//! - Scan a directory for configuration files (`*.ini`, `*.cfg`, `*.conf`)

use crate::access::extract;
use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::{LoadedProject, ScanStatus, ScannedConfig};
use crate::parser::{parse_with, ParseOptions};
use rck_protocol::project_models::ProjectConfig;
use rck_protocol::value_models::Document;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File extensions treated as configuration files by [`scan_dir`].
pub const CONFIG_EXTENSIONS: [&str; 3] = ["ini", "cfg", "conf"];

/// Sections a project file must define before schema extraction.
const REQUIRED_SECTIONS: [&str; 4] = ["project", "analysis", "execution_control", "technologies"];

/// Reads and parses a file with the default options.
pub fn load_document(path: &Path) -> ConfigResult<Document> {
    load_document_with(path, &ParseOptions::default())
}

/// Reads and parses a file with explicit parser options.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - The file cannot be read
/// - The file is not valid nested INI
pub fn load_document_with(path: &Path, options: &ParseOptions) -> ConfigResult<Document> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(path, &content, options)
}

/// Loads a reV project file.
///
/// # Arguments
///
/// * `path` - Path of the project file
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - The file cannot be read or parsed
/// - A required top-level section is missing
/// - A section does not match the project schema
///
/// # Example
///
/// ```rust,no_run
/// use rck_core::config::loader::load_project;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let project = load_project(Path::new("project.ini")).await?;
/// println!("Loaded {} technologies", project.config.technologies.len());
/// # Ok(())
/// # }
/// ```
pub async fn load_project(path: &Path) -> ConfigResult<LoadedProject> {
    load_project_with(path, &ParseOptions::default()).await
}

/// Loads a reV project file with explicit parser options.
pub async fn load_project_with(path: &Path, options: &ParseOptions) -> ConfigResult<LoadedProject> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
    let document = parse_document(path, &content, options)?;

    for name in REQUIRED_SECTIONS {
        if document.section(name).is_none() {
            return Err(ConfigError::InvalidConfig {
                path: path.to_path_buf(),
                reason: format!("missing [{name}] section"),
            });
        }
    }

    let config: ProjectConfig =
        extract(&document.root).map_err(|e| ConfigError::Deserialize {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    info!(
        path = %path.display(),
        project = %config.project.name,
        technologies = config.technologies.len(),
        tasks = config.pipeline.len(),
        "loaded project"
    );

    Ok(LoadedProject {
        path: path.to_path_buf(),
        document,
        config,
    })
}

/// Lists configuration files directly inside `dir` and parses each one.
///
/// Files that fail to read or parse are reported with
/// [`ScanStatus::Invalid`] rather than aborting the scan. Results are
/// sorted by file name.
///
/// # Errors
///
/// Returns `ConfigError::DirectoryWalk` if `dir` cannot be traversed.
pub fn scan_dir(dir: &Path) -> ConfigResult<Vec<ScannedConfig>> {
    let mut found = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = entry.map_err(|source| ConfigError::DirectoryWalk {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = entry.path();
        if !entry.file_type().is_file() || !is_config_file(path) {
            debug!(path = %path.display(), "skipping non-config entry");
            continue;
        }

        let status = match load_document(path) {
            Ok(doc) => ScanStatus::Parsed {
                sections: doc.root.section_count(),
                entries: doc.root.entry_count(),
                max_depth: doc.max_depth(),
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config file is invalid");
                ScanStatus::Invalid {
                    reason: e.to_string(),
                }
            }
        };
        found.push(ScannedConfig {
            path: PathBuf::from(path),
            status,
        });
    }

    Ok(found)
}

fn is_config_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| CONFIG_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

fn parse_document(path: &Path, content: &str, options: &ParseOptions) -> ConfigResult<Document> {
    let document = parse_with(content, options).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "parsed config file");
    Ok(document)
}
