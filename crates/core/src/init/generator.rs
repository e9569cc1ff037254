//! Project file generation from embedded templates.

use super::error::{InitError, InitResult};
use super::templates::get_template;
use std::path::PathBuf;
use tokio::fs;
use tracing::info;

/// Name of the generated file.
pub const PROJECT_FILE: &str = "project.ini";

/// Options for initializing a project file.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Directory the project file is written to. Created if missing.
    pub target_dir: PathBuf,

    /// Overwrite an existing project file.
    pub force: bool,

    /// Write the minimal template instead of the full one.
    pub minimal: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
            minimal: false,
        }
    }
}

/// Write `project.ini` into `options.target_dir`.
///
/// Returns the path of the written file, or an `InitError` if:
/// - The file already exists (without force flag)
/// - The directory or file cannot be written
pub async fn generate_project(options: InitOptions) -> InitResult<PathBuf> {
    let target = options.target_dir.join(PROJECT_FILE);

    if !options.force {
        let exists = fs::try_exists(&target)
            .await
            .map_err(|source| InitError::FileWrite {
                path: target.clone(),
                source,
            })?;
        if exists {
            return Err(InitError::FileExists(target));
        }
    }

    let template = if options.minimal {
        "minimal.ini"
    } else {
        PROJECT_FILE
    };
    let content =
        get_template(template).ok_or_else(|| InitError::TemplateNotFound(template.to_string()))?;

    fs::create_dir_all(&options.target_dir)
        .await
        .map_err(|source| InitError::DirectoryCreate {
            path: options.target_dir.clone(),
            source,
        })?;

    fs::write(&target, content)
        .await
        .map_err(|source| InitError::FileWrite {
            path: target.clone(),
            source,
        })?;

    info!(path = %target.display(), template, "wrote project template");
    Ok(target)
}
