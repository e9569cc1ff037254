//! Test fixtures for project files.

use rck_core::init::get_template;
use std::path::PathBuf;
use tempfile::TempDir;

/// The full Rhode Island PV project file.
pub fn project_ini() -> String {
    get_template("project.ini").expect("project.ini template should be embedded")
}

/// The minimal single-year project file.
#[allow(dead_code)]
pub fn minimal_ini() -> String {
    get_template("minimal.ini").expect("minimal.ini template should be embedded")
}

/// Write `content` to `name` inside a fresh temporary directory.
///
/// Returns the TempDir, which must be kept alive for the test duration,
/// and the path of the written file.
#[allow(dead_code)]
pub fn write_temp(name: &str, content: &str) -> std::io::Result<(TempDir, PathBuf)> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(name);
    std::fs::write(&path, content)?;
    Ok((dir, path))
}
